// src/domain/analytics.rs
use crate::domain::errors::DomainResult;
use crate::domain::post::PostId;
use crate::domain::slug::Slug;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::fmt;

pub const DIRECT_REFERRER: &str = "Direct";

#[derive(Debug, Clone)]
pub struct NewPostView {
    pub post_id: PostId,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub viewed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RecordedView {
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub viewed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyViews {
    pub date: NaiveDate,
    pub views: u64,
}

/// Compact post row used by every analytics listing.
#[derive(Debug, Clone)]
pub struct PostViewSummary {
    pub id: PostId,
    pub title: String,
    pub slug: Slug,
    pub view_count: i64,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardOverview {
    pub total_posts: u64,
    pub published_posts: u64,
    pub draft_posts: u64,
    pub total_views: u64,
    pub total_categories: u64,
    pub total_tags: u64,
    pub recent_views: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Browser {
    Edge,
    Chrome,
    Firefox,
    Safari,
    Unknown,
}

impl Browser {
    /// Edge and Chrome both advertise `Chrome` and `Safari`, so the more
    /// specific tokens are checked first.
    pub fn detect(user_agent: &str) -> Self {
        if user_agent.contains("Edg") {
            Browser::Edge
        } else if user_agent.contains("Chrome") {
            Browser::Chrome
        } else if user_agent.contains("Firefox") {
            Browser::Firefox
        } else if user_agent.contains("Safari") {
            Browser::Safari
        } else {
            Browser::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Edge => "Edge",
            Browser::Chrome => "Chrome",
            Browser::Firefox => "Firefox",
            Browser::Safari => "Safari",
            Browser::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCount {
    pub source: String,
    pub count: u64,
}

/// Counts views per referrer, most frequent first. Missing or blank
/// referrers are grouped as `Direct`.
pub fn referrer_breakdown(views: &[RecordedView]) -> Vec<SourceCount> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for view in views {
        let source = view
            .referrer
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DIRECT_REFERRER);
        *counts.entry(source.to_string()).or_default() += 1;
    }
    sorted_counts(counts)
}

/// Views without a user agent are skipped.
pub fn browser_breakdown(views: &[RecordedView]) -> Vec<SourceCount> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for agent in views.iter().filter_map(|v| v.user_agent.as_deref()) {
        *counts
            .entry(Browser::detect(agent).as_str().to_string())
            .or_default() += 1;
    }
    sorted_counts(counts)
}

fn sorted_counts(counts: BTreeMap<String, u64>) -> Vec<SourceCount> {
    let mut out: Vec<SourceCount> = counts
        .into_iter()
        .map(|(source, count)| SourceCount { source, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.source.cmp(&b.source)));
    out
}

#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    async fn record_view(&self, view: NewPostView) -> DomainResult<()>;
    /// `recent_since` bounds the `recent_views` counter.
    async fn overview(&self, recent_since: DateTime<Utc>) -> DomainResult<DashboardOverview>;
    /// Published posts ordered by view count.
    async fn popular_posts(&self, limit: u32) -> DomainResult<Vec<PostViewSummary>>;
    /// Published posts published since `since`, ordered by view count.
    async fn recent_popular_posts(
        &self,
        since: DateTime<Utc>,
        limit: u32,
    ) -> DomainResult<Vec<PostViewSummary>>;
    async fn post_summary(&self, id: PostId) -> DomainResult<Option<PostViewSummary>>;
    /// Newest first.
    async fn recent_views(
        &self,
        id: PostId,
        since: DateTime<Utc>,
        limit: u32,
    ) -> DomainResult<Vec<RecordedView>>;
    /// Oldest day first. `None` aggregates over every post.
    async fn daily_views(
        &self,
        id: Option<PostId>,
        since: DateTime<Utc>,
    ) -> DomainResult<Vec<DailyViews>>;
}
