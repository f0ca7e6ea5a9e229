// src/application/queries/newsletter.rs
use std::sync::Arc;

use chrono::{Duration, Months};

use super::page_request;
use crate::{
    application::{
        dto::{AuthenticatedUser, NewsletterStatsDto, PaginatedResult, SubscriberDto},
        error::ApplicationResult,
        ports::time::Clock,
    },
    domain::newsletter::{NewsletterRepository, NewsletterStats, SubscriberStatus, growth_rate},
};

pub const DEFAULT_SUBSCRIBER_PAGE_SIZE: u32 = 50;
const RECENT_WINDOW_DAYS: i64 = 7;
const MONTHLY_WINDOW: u32 = 12;

#[derive(Debug, Clone, Default)]
pub struct ListSubscribersQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
}

pub struct NewsletterQueryService {
    repo: Arc<dyn NewsletterRepository>,
    clock: Arc<dyn Clock>,
}

impl NewsletterQueryService {
    pub fn new(repo: Arc<dyn NewsletterRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub async fn list_subscribers(
        &self,
        actor: &AuthenticatedUser,
        query: ListSubscribersQuery,
    ) -> ApplicationResult<PaginatedResult<SubscriberDto>> {
        actor.require("newsletter", "manage")?;

        let page = page_request(query.page, query.limit, DEFAULT_SUBSCRIBER_PAGE_SIZE)?;
        let status = match query.status.as_deref() {
            Some(raw) => raw.parse()?,
            None => SubscriberStatus::All,
        };

        let (items, total) = self.repo.list(status, page).await?;
        Ok(PaginatedResult::new(items, total, page).map(SubscriberDto::from))
    }

    pub async fn stats(&self, actor: &AuthenticatedUser) -> ApplicationResult<NewsletterStatsDto> {
        actor.require("newsletter", "manage")?;

        let now = self.clock.now();
        let total = self.repo.count(SubscriberStatus::All).await?;
        let active = self.repo.count(SubscriberStatus::Active).await?;
        let inactive = self.repo.count(SubscriberStatus::Inactive).await?;
        let recent = self
            .repo
            .count_subscribed_since(now - Duration::days(RECENT_WINDOW_DAYS))
            .await?;
        let year_ago = now
            .checked_sub_months(Months::new(MONTHLY_WINDOW))
            .unwrap_or(now);
        let monthly = self.repo.monthly_counts_since(year_ago).await?;

        Ok(NewsletterStats {
            total,
            active,
            inactive,
            recent,
            growth_rate: growth_rate(recent, total),
            monthly,
        }
        .into())
    }
}
