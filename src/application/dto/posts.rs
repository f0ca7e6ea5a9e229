use crate::domain::category::Category;
use crate::domain::post::{LinkKind, PostDetails};
use crate::domain::tag::Tag;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::serde_time;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorDto {
    pub id: i64,
    pub name: String,
}

/// Category or tag reference embedded in a post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct LinkedTermDto {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl From<Category> for LinkedTermDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.into(),
            name: category.name.into(),
            slug: category.slug.into_inner(),
            color: category.color,
        }
    }
}

impl From<Tag> for LinkedTermDto {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id.into(),
            name: tag.name.into(),
            slug: tag.slug.into_inner(),
            color: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostDto {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub meta_description: Option<String>,
    pub featured_image: Option<String>,
    pub reading_time: Option<i32>,
    pub is_published: bool,
    #[serde(default, with = "serde_time::option")]
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: i64,
    pub author: AuthorDto,
    pub categories: Vec<LinkedTermDto>,
    pub tags: Vec<LinkedTermDto>,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "serde_time")]
    pub updated_at: DateTime<Utc>,
}

impl From<PostDetails> for PostDto {
    fn from(details: PostDetails) -> Self {
        let PostDetails {
            post,
            author_name,
            categories,
            tags,
        } = details;
        Self {
            id: post.id.into(),
            title: post.title.into(),
            slug: post.slug.into_inner(),
            content: post.content.into(),
            excerpt: post.excerpt,
            meta_description: post.meta_description,
            featured_image: post.featured_image,
            reading_time: post.reading_time.map(|r| r.minutes()),
            is_published: post.published,
            published_at: post.published_at,
            view_count: post.view_count,
            author: AuthorDto {
                id: post.author_id.into(),
                name: author_name,
            },
            categories: categories.into_iter().map(Into::into).collect(),
            tags: tags.into_iter().map(Into::into).collect(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Link set of one kind after a replacement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostLinksDto {
    pub post_id: i64,
    pub kind: String,
    pub ids: Vec<i64>,
}

impl PostLinksDto {
    pub fn new(post_id: i64, kind: LinkKind, ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            post_id,
            kind: kind.as_str().to_string(),
            ids: ids.into_iter().collect(),
        }
    }
}
