// src/infrastructure/repositories/slugs.rs
use super::map_sqlx;
use crate::domain::errors::DomainResult;
use crate::domain::slug::{Slug, SlugRegistry, SluggableKind};
use async_trait::async_trait;
use sqlx::PgPool;

#[derive(Clone)]
pub struct PostgresSlugRegistry {
    pool: PgPool,
}

impl PostgresSlugRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn table_for(kind: SluggableKind) -> &'static str {
    match kind {
        SluggableKind::Post => "posts",
        SluggableKind::Category => "categories",
        SluggableKind::Tag => "tags",
    }
}

#[async_trait]
impl SlugRegistry for PostgresSlugRegistry {
    async fn exists_by_slug(
        &self,
        kind: SluggableKind,
        slug: &Slug,
        exclude_id: Option<i64>,
    ) -> DomainResult<bool> {
        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE slug = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
            table_for(kind)
        );
        sqlx::query_scalar::<_, bool>(&sql)
            .bind(slug.as_str())
            .bind(exclude_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)
    }
}
