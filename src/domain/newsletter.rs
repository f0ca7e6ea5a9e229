// src/domain/newsletter.rs
use crate::domain::email::EmailAddress;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::pagination::PageRequest;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub i64);

impl SubscriberId {
    pub fn new(id: i64) -> DomainResult<Self> {
        if id <= 0 {
            Err(DomainError::Validation(
                "subscriber id must be positive".into(),
            ))
        } else {
            Ok(Self(id))
        }
    }
}

impl From<SubscriberId> for i64 {
    fn from(value: SubscriberId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone)]
pub struct Subscriber {
    pub id: SubscriberId,
    pub email: EmailAddress,
    pub is_active: bool,
    pub subscribed_at: DateTime<Utc>,
    pub unsubscribed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub enum SubscribeOutcome {
    Created(Subscriber),
    AlreadyActive(Subscriber),
    Reactivated(Subscriber),
}

#[derive(Debug, Clone)]
pub enum UnsubscribeOutcome {
    Unsubscribed(Subscriber),
    AlreadyInactive(Subscriber),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubscriberStatus {
    #[default]
    All,
    Active,
    Inactive,
}

impl FromStr for SubscriberStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(DomainError::Validation(format!(
                "unknown subscriber status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Activate,
    Deactivate,
    Delete,
}

impl BulkAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BulkAction::Activate => "activate",
            BulkAction::Deactivate => "deactivate",
            BulkAction::Delete => "delete",
        }
    }
}

impl FromStr for BulkAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "activate" => Ok(Self::Activate),
            "deactivate" => Ok(Self::Deactivate),
            "delete" => Ok(Self::Delete),
            _ => Err(DomainError::Validation("invalid action".into())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyCount {
    /// First day of the month.
    pub month: NaiveDate,
    pub subscriptions: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewsletterStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub recent: u64,
    pub growth_rate: f64,
    pub monthly: Vec<MonthlyCount>,
}

/// Share of subscriptions that are recent, in percent with two decimals.
pub fn growth_rate(recent: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = recent as f64 / total as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

#[async_trait]
pub trait NewsletterRepository: Send + Sync {
    async fn find_by_email(&self, email: &EmailAddress) -> DomainResult<Option<Subscriber>>;
    async fn insert(&self, email: EmailAddress, now: DateTime<Utc>) -> DomainResult<Subscriber>;
    /// Activating clears `unsubscribed_at`, deactivating stamps it with `now`.
    async fn set_active(
        &self,
        id: SubscriberId,
        active: bool,
        now: DateTime<Utc>,
    ) -> DomainResult<Subscriber>;
    /// Newest subscriptions first.
    async fn list(
        &self,
        status: SubscriberStatus,
        page: PageRequest,
    ) -> DomainResult<(Vec<Subscriber>, u64)>;
    /// Returns `false` when no row matched.
    async fn delete(&self, id: SubscriberId) -> DomainResult<bool>;
    /// Returns the number of affected rows.
    async fn apply_bulk(
        &self,
        action: BulkAction,
        ids: &[SubscriberId],
        now: DateTime<Utc>,
    ) -> DomainResult<u64>;
    async fn count(&self, status: SubscriberStatus) -> DomainResult<u64>;
    async fn count_subscribed_since(&self, since: DateTime<Utc>) -> DomainResult<u64>;
    /// Newest month first.
    async fn monthly_counts_since(&self, since: DateTime<Utc>) -> DomainResult<Vec<MonthlyCount>>;
}
