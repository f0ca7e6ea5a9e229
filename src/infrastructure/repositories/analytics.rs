// src/infrastructure/repositories/analytics.rs
use super::{map_sqlx, to_count};
use crate::domain::analytics::{
    AnalyticsRepository, DailyViews, DashboardOverview, NewPostView, PostViewSummary,
    RecordedView,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::post::PostId;
use crate::domain::slug::Slug;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};

const SUMMARY_COLUMNS: &str = "id, title, slug, view_count, published, published_at";

#[derive(Clone)]
pub struct PostgresAnalyticsRepository {
    pool: PgPool,
}

impl PostgresAnalyticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SummaryRow {
    id: i64,
    title: String,
    slug: String,
    view_count: i64,
    published: bool,
    published_at: Option<DateTime<Utc>>,
}

impl TryFrom<SummaryRow> for PostViewSummary {
    type Error = DomainError;

    fn try_from(row: SummaryRow) -> Result<Self, Self::Error> {
        Ok(PostViewSummary {
            id: PostId::new(row.id)?,
            title: row.title,
            slug: Slug::new(row.slug)?,
            view_count: row.view_count,
            published: row.published,
            published_at: row.published_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct OverviewRow {
    total_posts: i64,
    published_posts: i64,
    total_views: i64,
    total_categories: i64,
    total_tags: i64,
    recent_views: i64,
}

#[derive(Debug, FromRow)]
struct ViewRow {
    referrer: Option<String>,
    user_agent: Option<String>,
    viewed_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct DailyRow {
    date: NaiveDate,
    views: i64,
}

fn summaries(rows: Vec<SummaryRow>) -> DomainResult<Vec<PostViewSummary>> {
    rows.into_iter().map(PostViewSummary::try_from).collect()
}

#[async_trait]
impl AnalyticsRepository for PostgresAnalyticsRepository {
    async fn record_view(&self, view: NewPostView) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO post_views (post_id, ip_address, user_agent, referrer, viewed_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(i64::from(view.post_id))
        .bind(view.ip_address)
        .bind(view.user_agent)
        .bind(view.referrer)
        .bind(view.viewed_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn overview(&self, recent_since: DateTime<Utc>) -> DomainResult<DashboardOverview> {
        let row = sqlx::query_as::<_, OverviewRow>(
            "SELECT
                 (SELECT COUNT(*) FROM posts) AS total_posts,
                 (SELECT COUNT(*) FROM posts WHERE published) AS published_posts,
                 (SELECT COALESCE(SUM(view_count), 0)::BIGINT FROM posts) AS total_views,
                 (SELECT COUNT(*) FROM categories) AS total_categories,
                 (SELECT COUNT(*) FROM tags) AS total_tags,
                 (SELECT COUNT(*) FROM post_views WHERE viewed_at >= $1) AS recent_views",
        )
        .bind(recent_since)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let total_posts = to_count(row.total_posts);
        let published_posts = to_count(row.published_posts);
        Ok(DashboardOverview {
            total_posts,
            published_posts,
            draft_posts: total_posts.saturating_sub(published_posts),
            total_views: to_count(row.total_views),
            total_categories: to_count(row.total_categories),
            total_tags: to_count(row.total_tags),
            recent_views: to_count(row.recent_views),
        })
    }

    async fn popular_posts(&self, limit: u32) -> DomainResult<Vec<PostViewSummary>> {
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS} FROM posts
             WHERE published
             ORDER BY view_count DESC, id DESC
             LIMIT $1"
        );
        let rows = sqlx::query_as::<_, SummaryRow>(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;
        summaries(rows)
    }

    async fn recent_popular_posts(
        &self,
        since: DateTime<Utc>,
        limit: u32,
    ) -> DomainResult<Vec<PostViewSummary>> {
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS} FROM posts
             WHERE published AND published_at >= $1
             ORDER BY view_count DESC, id DESC
             LIMIT $2"
        );
        let rows = sqlx::query_as::<_, SummaryRow>(&sql)
            .bind(since)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;
        summaries(rows)
    }

    async fn post_summary(&self, id: PostId) -> DomainResult<Option<PostViewSummary>> {
        let sql = format!("SELECT {SUMMARY_COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, SummaryRow>(&sql)
            .bind(i64::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .map(PostViewSummary::try_from)
            .transpose()
    }

    async fn recent_views(
        &self,
        id: PostId,
        since: DateTime<Utc>,
        limit: u32,
    ) -> DomainResult<Vec<RecordedView>> {
        let rows = sqlx::query_as::<_, ViewRow>(
            "SELECT referrer, user_agent, viewed_at FROM post_views
             WHERE post_id = $1 AND viewed_at >= $2
             ORDER BY viewed_at DESC
             LIMIT $3",
        )
        .bind(i64::from(id))
        .bind(since)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(rows
            .into_iter()
            .map(|row| RecordedView {
                referrer: row.referrer,
                user_agent: row.user_agent,
                viewed_at: row.viewed_at,
            })
            .collect())
    }

    async fn daily_views(
        &self,
        id: Option<PostId>,
        since: DateTime<Utc>,
    ) -> DomainResult<Vec<DailyViews>> {
        let rows = sqlx::query_as::<_, DailyRow>(
            "SELECT viewed_at::DATE AS date, COUNT(*) AS views
             FROM post_views
             WHERE viewed_at >= $1 AND ($2::BIGINT IS NULL OR post_id = $2)
             GROUP BY 1
             ORDER BY 1 ASC",
        )
        .bind(since)
        .bind(id.map(i64::from))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(rows
            .into_iter()
            .map(|row| DailyViews {
                date: row.date,
                views: to_count(row.views),
            })
            .collect())
    }
}
