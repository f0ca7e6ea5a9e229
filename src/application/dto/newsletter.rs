use crate::domain::newsletter::{MonthlyCount, NewsletterStats, Subscriber};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::serde_time;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscriberDto {
    pub id: i64,
    pub email: String,
    pub is_active: bool,
    #[serde(with = "serde_time")]
    pub subscribed_at: DateTime<Utc>,
    #[serde(default, with = "serde_time::option")]
    pub unsubscribed_at: Option<DateTime<Utc>>,
}

impl From<Subscriber> for SubscriberDto {
    fn from(value: Subscriber) -> Self {
        Self {
            id: value.id.into(),
            email: value.email.to_string(),
            is_active: value.is_active,
            subscribed_at: value.subscribed_at,
            unsubscribed_at: value.unsubscribed_at,
        }
    }
}

/// Result of a public subscribe or unsubscribe call.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResultDto {
    pub message: String,
    #[serde(skip)]
    pub created: bool,
}

impl SubscriptionResultDto {
    pub fn new(message: impl Into<String>, created: bool) -> Self {
        Self {
            message: message.into(),
            created,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MonthlyCountDto {
    #[schema(value_type = String, format = Date)]
    pub month: NaiveDate,
    pub subscriptions: u64,
}

impl From<MonthlyCount> for MonthlyCountDto {
    fn from(value: MonthlyCount) -> Self {
        Self {
            month: value.month,
            subscriptions: value.subscriptions,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewsletterOverviewDto {
    pub total_subscribers: u64,
    pub active_subscribers: u64,
    pub inactive_subscribers: u64,
    pub recent_subscriptions: u64,
    pub growth_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewsletterStatsDto {
    pub overview: NewsletterOverviewDto,
    pub monthly_growth: Vec<MonthlyCountDto>,
}

impl From<NewsletterStats> for NewsletterStatsDto {
    fn from(stats: NewsletterStats) -> Self {
        Self {
            overview: NewsletterOverviewDto {
                total_subscribers: stats.total,
                active_subscribers: stats.active,
                inactive_subscribers: stats.inactive,
                recent_subscriptions: stats.recent,
                growth_rate: stats.growth_rate,
            },
            monthly_growth: stats.monthly.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkActionResultDto {
    pub message: String,
    pub affected: u64,
}
