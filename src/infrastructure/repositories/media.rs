// src/infrastructure/repositories/media.rs
use super::{map_sqlx, to_count};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::media::{AttachedPost, Media, MediaId, MediaRepository, MediaUpdate};
use crate::domain::pagination::PageRequest;
use crate::domain::post::PostId;
use crate::domain::slug::Slug;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

/// Selected from `m` (media) left-joined to `p` (posts).
const MEDIA_COLUMNS: &str = "m.id, m.filename, m.original_name, m.mime_type, m.size, m.url, \
     m.alt_text, m.caption, m.created_at, \
     p.id AS post_id, p.title AS post_title, p.slug AS post_slug";

#[derive(Clone)]
pub struct PostgresMediaRepository {
    pool: PgPool,
}

impl PostgresMediaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct MediaRow {
    id: i64,
    filename: String,
    original_name: String,
    mime_type: String,
    size: i64,
    url: String,
    alt_text: String,
    caption: String,
    created_at: DateTime<Utc>,
    post_id: Option<i64>,
    post_title: Option<String>,
    post_slug: Option<String>,
}

impl TryFrom<MediaRow> for Media {
    type Error = DomainError;

    fn try_from(row: MediaRow) -> Result<Self, Self::Error> {
        let post = match (row.post_id, row.post_title, row.post_slug) {
            (Some(id), Some(title), Some(slug)) => Some(AttachedPost {
                id: PostId::new(id)?,
                title,
                slug: Slug::new(slug)?,
            }),
            _ => None,
        };

        Ok(Media {
            id: MediaId::new(row.id)?,
            filename: row.filename,
            original_name: row.original_name,
            mime_type: row.mime_type,
            size: row.size,
            url: row.url,
            alt_text: row.alt_text,
            caption: row.caption,
            post,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl MediaRepository for PostgresMediaRepository {
    async fn list(&self, page: PageRequest) -> DomainResult<(Vec<Media>, u64)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM media")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let sql = format!(
            "SELECT {MEDIA_COLUMNS}
             FROM media m
             LEFT JOIN posts p ON p.id = m.post_id
             ORDER BY m.created_at DESC, m.id DESC
             LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, MediaRow>(&sql)
            .bind(i64::from(page.limit()))
            .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let items = rows
            .into_iter()
            .map(Media::try_from)
            .collect::<DomainResult<Vec<_>>>()?;
        Ok((items, to_count(total)))
    }

    async fn find_by_id(&self, id: MediaId) -> DomainResult<Option<Media>> {
        let sql = format!(
            "SELECT {MEDIA_COLUMNS}
             FROM media m
             LEFT JOIN posts p ON p.id = m.post_id
             WHERE m.id = $1"
        );
        sqlx::query_as::<_, MediaRow>(&sql)
            .bind(i64::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .map(Media::try_from)
            .transpose()
    }

    async fn update(&self, id: MediaId, update: MediaUpdate) -> DomainResult<Media> {
        let sql = format!(
            "WITH m AS (
                UPDATE media
                SET alt_text = COALESCE($2, alt_text),
                    caption = COALESCE($3, caption),
                    post_id = CASE WHEN $4 THEN $5 ELSE post_id END
                WHERE id = $1
                RETURNING *
             )
             SELECT {MEDIA_COLUMNS}
             FROM m
             LEFT JOIN posts p ON p.id = m.post_id"
        );
        let row = sqlx::query_as::<_, MediaRow>(&sql)
            .bind(i64::from(id))
            .bind(update.alt_text)
            .bind(update.caption)
            .bind(update.post_id.is_some())
            .bind(update.post_id.flatten().map(i64::from))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .ok_or_else(|| DomainError::NotFound("media not found".into()))?;
        Media::try_from(row)
    }

    async fn delete(&self, id: MediaId) -> DomainResult<Option<Media>> {
        let sql = format!(
            "WITH m AS (DELETE FROM media WHERE id = $1 RETURNING *)
             SELECT {MEDIA_COLUMNS}
             FROM m
             LEFT JOIN posts p ON p.id = m.post_id"
        );
        sqlx::query_as::<_, MediaRow>(&sql)
            .bind(i64::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .map(Media::try_from)
            .transpose()
    }
}
