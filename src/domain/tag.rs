// src/domain/tag.rs
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::slug::Slug;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(pub i64);

impl TagId {
    pub fn new(id: i64) -> DomainResult<Self> {
        if id <= 0 {
            Err(DomainError::Validation("tag id must be positive".into()))
        } else {
            Ok(Self(id))
        }
    }
}

impl From<TagId> for i64 {
    fn from(value: TagId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagName(String);

impl TagName {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::Validation("name is required".into()));
        }
        Ok(Self(value.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TagName> for String {
    fn from(value: TagName) -> Self {
        value.0
    }
}

#[derive(Debug, Clone)]
pub struct Tag {
    pub id: TagId,
    pub name: TagName,
    pub slug: Slug,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TagWithCount {
    pub tag: Tag,
    pub post_count: u64,
}

#[derive(Debug, Clone)]
pub struct NewTag {
    pub name: TagName,
    pub slug: Slug,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TagUpdate {
    pub id: TagId,
    pub name: TagName,
    pub slug: Slug,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn insert(&self, tag: NewTag) -> DomainResult<Tag>;
    async fn update(&self, update: TagUpdate) -> DomainResult<Tag>;
    async fn delete(&self, id: TagId) -> DomainResult<()>;
    async fn find_by_id(&self, id: TagId) -> DomainResult<Option<Tag>>;
    async fn find_by_slug(&self, slug: &Slug) -> DomainResult<Option<Tag>>;
    async fn list_with_post_counts(&self) -> DomainResult<Vec<TagWithCount>>;
    async fn count_linked_posts(&self, id: TagId) -> DomainResult<u64>;
}
