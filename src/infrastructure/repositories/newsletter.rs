// src/infrastructure/repositories/newsletter.rs
use super::{map_sqlx, to_count};
use crate::domain::email::EmailAddress;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::newsletter::{
    BulkAction, MonthlyCount, NewsletterRepository, Subscriber, SubscriberId, SubscriberStatus,
};
use crate::domain::pagination::PageRequest;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};

const SUBSCRIBER_COLUMNS: &str = "id, email, is_active, subscribed_at, unsubscribed_at";

#[derive(Clone)]
pub struct PostgresNewsletterRepository {
    pool: PgPool,
}

impl PostgresNewsletterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SubscriberRow {
    id: i64,
    email: String,
    is_active: bool,
    subscribed_at: DateTime<Utc>,
    unsubscribed_at: Option<DateTime<Utc>>,
}

impl TryFrom<SubscriberRow> for Subscriber {
    type Error = DomainError;

    fn try_from(row: SubscriberRow) -> Result<Self, Self::Error> {
        Ok(Subscriber {
            id: SubscriberId::new(row.id)?,
            email: EmailAddress::new(row.email)?,
            is_active: row.is_active,
            subscribed_at: row.subscribed_at,
            unsubscribed_at: row.unsubscribed_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct MonthlyRow {
    month: NaiveDate,
    subscriptions: i64,
}

fn status_clause(status: SubscriberStatus) -> &'static str {
    match status {
        SubscriberStatus::All => "TRUE",
        SubscriberStatus::Active => "is_active = TRUE",
        SubscriberStatus::Inactive => "is_active = FALSE",
    }
}

#[async_trait]
impl NewsletterRepository for PostgresNewsletterRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> DomainResult<Option<Subscriber>> {
        let sql = format!("SELECT {SUBSCRIBER_COLUMNS} FROM newsletter_subscribers WHERE email = $1");
        sqlx::query_as::<_, SubscriberRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .map(Subscriber::try_from)
            .transpose()
    }

    async fn insert(&self, email: EmailAddress, now: DateTime<Utc>) -> DomainResult<Subscriber> {
        let sql = format!(
            "INSERT INTO newsletter_subscribers (email, is_active, subscribed_at)
             VALUES ($1, TRUE, $2)
             RETURNING {SUBSCRIBER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SubscriberRow>(&sql)
            .bind(email.as_str())
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Subscriber::try_from(row)
    }

    async fn set_active(
        &self,
        id: SubscriberId,
        active: bool,
        now: DateTime<Utc>,
    ) -> DomainResult<Subscriber> {
        let sql = format!(
            "UPDATE newsletter_subscribers
             SET is_active = $1, unsubscribed_at = CASE WHEN $1 THEN NULL ELSE $2 END
             WHERE id = $3
             RETURNING {SUBSCRIBER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SubscriberRow>(&sql)
            .bind(active)
            .bind(now)
            .bind(i64::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .ok_or_else(|| DomainError::NotFound("subscriber not found".into()))?;
        Subscriber::try_from(row)
    }

    async fn list(
        &self,
        status: SubscriberStatus,
        page: PageRequest,
    ) -> DomainResult<(Vec<Subscriber>, u64)> {
        let clause = status_clause(status);

        let count_sql = format!("SELECT COUNT(*) FROM newsletter_subscribers WHERE {clause}");
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let sql = format!(
            "SELECT {SUBSCRIBER_COLUMNS} FROM newsletter_subscribers
             WHERE {clause}
             ORDER BY subscribed_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, SubscriberRow>(&sql)
            .bind(i64::from(page.limit()))
            .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let items = rows
            .into_iter()
            .map(Subscriber::try_from)
            .collect::<DomainResult<Vec<_>>>()?;
        Ok((items, to_count(total)))
    }

    async fn delete(&self, id: SubscriberId) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM newsletter_subscribers WHERE id = $1")
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(result.rows_affected() > 0)
    }

    async fn apply_bulk(
        &self,
        action: BulkAction,
        ids: &[SubscriberId],
        now: DateTime<Utc>,
    ) -> DomainResult<u64> {
        let ids: Vec<i64> = ids.iter().copied().map(i64::from).collect();
        let query = match action {
            BulkAction::Activate => sqlx::query(
                "UPDATE newsletter_subscribers SET is_active = TRUE, unsubscribed_at = NULL
                 WHERE id = ANY($1)",
            )
            .bind(ids),
            BulkAction::Deactivate => sqlx::query(
                "UPDATE newsletter_subscribers SET is_active = FALSE, unsubscribed_at = $2
                 WHERE id = ANY($1)",
            )
            .bind(ids)
            .bind(now),
            BulkAction::Delete => {
                sqlx::query("DELETE FROM newsletter_subscribers WHERE id = ANY($1)").bind(ids)
            }
        };

        query
            .execute(&self.pool)
            .await
            .map(|result| result.rows_affected())
            .map_err(map_sqlx)
    }

    async fn count(&self, status: SubscriberStatus) -> DomainResult<u64> {
        let sql = format!(
            "SELECT COUNT(*) FROM newsletter_subscribers WHERE {}",
            status_clause(status)
        );
        sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&self.pool)
            .await
            .map(to_count)
            .map_err(map_sqlx)
    }

    async fn count_subscribed_since(&self, since: DateTime<Utc>) -> DomainResult<u64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM newsletter_subscribers WHERE subscribed_at >= $1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map(to_count)
        .map_err(map_sqlx)
    }

    async fn monthly_counts_since(&self, since: DateTime<Utc>) -> DomainResult<Vec<MonthlyCount>> {
        let rows = sqlx::query_as::<_, MonthlyRow>(
            "SELECT DATE_TRUNC('month', subscribed_at)::DATE AS month, COUNT(*) AS subscriptions
             FROM newsletter_subscribers
             WHERE subscribed_at >= $1
             GROUP BY 1
             ORDER BY 1 DESC",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(rows
            .into_iter()
            .map(|row| MonthlyCount {
                month: row.month,
                subscriptions: to_count(row.subscriptions),
            })
            .collect())
    }
}
