// src/domain/media.rs
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::pagination::PageRequest;
use crate::domain::post::PostId;
use crate::domain::slug::Slug;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaId(pub i64);

impl MediaId {
    pub fn new(id: i64) -> DomainResult<Self> {
        if id <= 0 {
            Err(DomainError::Validation("media id must be positive".into()))
        } else {
            Ok(Self(id))
        }
    }
}

impl From<MediaId> for i64 {
    fn from(value: MediaId) -> Self {
        value.0
    }
}

/// Post a media item is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedPost {
    pub id: PostId,
    pub title: String,
    pub slug: Slug,
}

/// Metadata of an uploaded file. The bytes live in the upload directory
/// under `filename`; `url` is the public path they are served from.
#[derive(Debug, Clone)]
pub struct Media {
    pub id: MediaId,
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: i64,
    pub url: String,
    pub alt_text: String,
    pub caption: String,
    pub post: Option<AttachedPost>,
    pub created_at: DateTime<Utc>,
}

/// Fields left as `None` keep their stored value. `post_id: Some(None)`
/// detaches the item from its post.
#[derive(Debug, Clone, Default)]
pub struct MediaUpdate {
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub post_id: Option<Option<PostId>>,
}

impl MediaUpdate {
    pub fn is_empty(&self) -> bool {
        self.alt_text.is_none() && self.caption.is_none() && self.post_id.is_none()
    }
}

#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Newest uploads first.
    async fn list(&self, page: PageRequest) -> DomainResult<(Vec<Media>, u64)>;
    async fn find_by_id(&self, id: MediaId) -> DomainResult<Option<Media>>;
    /// Fails with `NotFound` for an unknown id and `InvalidReference` when
    /// the new post does not exist.
    async fn update(&self, id: MediaId, update: MediaUpdate) -> DomainResult<Media>;
    /// Returns the removed record, or `None` when no row matched.
    async fn delete(&self, id: MediaId) -> DomainResult<Option<Media>>;
}
