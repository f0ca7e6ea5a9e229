// src/infrastructure/repositories/tags.rs
use super::{map_sqlx, to_count};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::slug::Slug;
use crate::domain::tag::{NewTag, Tag, TagId, TagName, TagRepository, TagUpdate, TagWithCount};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

pub(super) const TAG_COLUMNS: &str = "t.id, t.name, t.slug, t.created_at, t.updated_at";

#[derive(Clone)]
pub struct PostgresTagRepository {
    pool: PgPool,
}

impl PostgresTagRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct TagRow {
    id: i64,
    name: String,
    slug: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TagRow> for Tag {
    type Error = DomainError;

    fn try_from(row: TagRow) -> Result<Self, Self::Error> {
        Ok(Tag {
            id: TagId::new(row.id)?,
            name: TagName::new(row.name)?,
            slug: Slug::new(row.slug)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct TagCountRow {
    #[sqlx(flatten)]
    tag: TagRow,
    post_count: i64,
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn insert(&self, tag: NewTag) -> DomainResult<Tag> {
        let row = sqlx::query_as::<_, TagRow>(
            "INSERT INTO tags AS t (name, slug, created_at, updated_at)
             VALUES ($1, $2, $3, $3)
             RETURNING t.id, t.name, t.slug, t.created_at, t.updated_at",
        )
        .bind(tag.name.as_str())
        .bind(tag.slug.as_str())
        .bind(tag.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Tag::try_from(row)
    }

    async fn update(&self, update: TagUpdate) -> DomainResult<Tag> {
        let row = sqlx::query_as::<_, TagRow>(
            "UPDATE tags AS t SET name = $1, slug = $2, updated_at = $3
             WHERE t.id = $4
             RETURNING t.id, t.name, t.slug, t.created_at, t.updated_at",
        )
        .bind(update.name.as_str())
        .bind(update.slug.as_str())
        .bind(update.updated_at)
        .bind(i64::from(update.id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?
        .ok_or_else(|| DomainError::NotFound("tag not found".into()))?;

        Tag::try_from(row)
    }

    async fn delete(&self, id: TagId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("tag not found".into()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: TagId) -> DomainResult<Option<Tag>> {
        let sql = format!("SELECT {TAG_COLUMNS} FROM tags t WHERE t.id = $1");
        sqlx::query_as::<_, TagRow>(&sql)
            .bind(i64::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .map(Tag::try_from)
            .transpose()
    }

    async fn find_by_slug(&self, slug: &Slug) -> DomainResult<Option<Tag>> {
        let sql = format!("SELECT {TAG_COLUMNS} FROM tags t WHERE t.slug = $1");
        sqlx::query_as::<_, TagRow>(&sql)
            .bind(slug.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .map(Tag::try_from)
            .transpose()
    }

    async fn list_with_post_counts(&self) -> DomainResult<Vec<TagWithCount>> {
        let sql = format!(
            "SELECT {TAG_COLUMNS}, COUNT(p.id) AS post_count
             FROM tags t
             LEFT JOIN post_tags pt ON pt.tag_id = t.id
             LEFT JOIN posts p ON p.id = pt.post_id AND p.published
             GROUP BY t.id
             ORDER BY t.name ASC"
        );
        let rows = sqlx::query_as::<_, TagCountRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        rows.into_iter()
            .map(|row| {
                Ok(TagWithCount {
                    tag: Tag::try_from(row.tag)?,
                    post_count: to_count(row.post_count),
                })
            })
            .collect()
    }

    async fn count_linked_posts(&self, id: TagId) -> DomainResult<u64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM post_tags WHERE tag_id = $1")
            .bind(i64::from(id))
            .fetch_one(&self.pool)
            .await
            .map(to_count)
            .map_err(map_sqlx)
    }
}
