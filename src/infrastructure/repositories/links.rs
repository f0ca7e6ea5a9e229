// src/infrastructure/repositories/links.rs
use super::map_sqlx;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::post::{LinkKind, LinkTargets, PostId, PostLinkRepository};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use std::collections::BTreeSet;

fn link_table(kind: LinkKind) -> (&'static str, &'static str) {
    match kind {
        LinkKind::Category => ("post_categories", "category_id"),
        LinkKind::Tag => ("post_tags", "tag_id"),
    }
}

/// Serialises replacements of the same post; the later commit wins with its
/// whole set.
const LOCK_POST_SQL: &str = "SELECT id FROM posts WHERE id = $1 FOR UPDATE";

/// Deletes every link of `kind` for the post and inserts `targets`, inside
/// the caller's transaction. Nothing is visible to other sessions before the
/// caller commits.
pub(super) async fn replace_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    post_id: i64,
    kind: LinkKind,
    targets: &BTreeSet<i64>,
) -> DomainResult<()> {
    let (table, column) = link_table(kind);

    sqlx::query_scalar::<_, i64>(LOCK_POST_SQL)
        .bind(post_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(map_sqlx)?
        .ok_or_else(|| DomainError::NotFound("post not found".into()))?;

    let delete = format!("DELETE FROM {table} WHERE post_id = $1");
    sqlx::query(&delete)
        .bind(post_id)
        .execute(&mut **tx)
        .await
        .map_err(map_sqlx)?;

    if targets.is_empty() {
        return Ok(());
    }

    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("INSERT INTO {table} (post_id, {column}) "));
    builder.push_values(targets, |mut row, target| {
        row.push_bind(post_id).push_bind(*target);
    });
    builder
        .build()
        .execute(&mut **tx)
        .await
        .map_err(map_sqlx)?;

    Ok(())
}

#[derive(Clone)]
pub struct PostgresPostLinkRepository {
    pool: PgPool,
}

impl PostgresPostLinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostLinkRepository for PostgresPostLinkRepository {
    async fn replace_links(&self, post_id: PostId, targets: &LinkTargets) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
        replace_in_tx(&mut tx, post_id.into(), targets.kind(), &targets.raw_ids()).await?;
        tx.commit().await.map_err(map_sqlx)
    }

    async fn links_of(&self, post_id: PostId, kind: LinkKind) -> DomainResult<BTreeSet<i64>> {
        let (table, column) = link_table(kind);
        let sql = format!("SELECT {column} FROM {table} WHERE post_id = $1");
        let ids = sqlx::query_scalar::<_, i64>(&sql)
            .bind(i64::from(post_id))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(ids.into_iter().collect())
    }
}
