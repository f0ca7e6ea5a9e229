use crate::domain::category::{Category, CategoryWithCount};
use crate::domain::tag::{Tag, TagWithCount};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{pagination::PaginatedResult, posts::PostDto, serde_time};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryDto {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: Option<String>,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "serde_time")]
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.into(),
            name: category.name.into(),
            slug: category.slug.into_inner(),
            description: category.description,
            color: category.color,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryWithCountDto {
    #[serde(flatten)]
    pub category: CategoryDto,
    pub post_count: u64,
}

impl From<CategoryWithCount> for CategoryWithCountDto {
    fn from(value: CategoryWithCount) -> Self {
        Self {
            category: value.category.into(),
            post_count: value.post_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryDetailDto {
    pub category: CategoryDto,
    pub posts: PaginatedResult<PostDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TagDto {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "serde_time")]
    pub updated_at: DateTime<Utc>,
}

impl From<Tag> for TagDto {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id.into(),
            name: tag.name.into(),
            slug: tag.slug.into_inner(),
            created_at: tag.created_at,
            updated_at: tag.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TagWithCountDto {
    #[serde(flatten)]
    pub tag: TagDto,
    pub post_count: u64,
}

impl From<TagWithCount> for TagWithCountDto {
    fn from(value: TagWithCount) -> Self {
        Self {
            tag: value.tag.into(),
            post_count: value.post_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TagDetailDto {
    pub tag: TagDto,
    pub posts: PaginatedResult<PostDto>,
}
