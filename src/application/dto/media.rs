use crate::domain::media::{AttachedPost, Media};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::serde_time;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MediaPostDto {
    pub id: i64,
    pub title: String,
    pub slug: String,
}

impl From<AttachedPost> for MediaPostDto {
    fn from(post: AttachedPost) -> Self {
        Self {
            id: post.id.into(),
            title: post.title,
            slug: post.slug.into_inner(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MediaDto {
    pub id: i64,
    #[schema(example = "file-1716206400-42.png")]
    pub filename: String,
    #[schema(example = "cover.png")]
    pub original_name: String,
    #[schema(example = "image/png")]
    pub mime_type: String,
    /// Bytes.
    pub size: i64,
    #[schema(example = "/uploads/file-1716206400-42.png")]
    pub url: String,
    pub alt_text: String,
    pub caption: String,
    pub post: Option<MediaPostDto>,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
}

impl From<Media> for MediaDto {
    fn from(media: Media) -> Self {
        Self {
            id: media.id.into(),
            filename: media.filename,
            original_name: media.original_name,
            mime_type: media.mime_type,
            size: media.size,
            url: media.url,
            alt_text: media.alt_text,
            caption: media.caption,
            post: media.post.map(Into::into),
            created_at: media.created_at,
        }
    }
}
