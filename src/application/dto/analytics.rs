use crate::domain::analytics::{DailyViews, DashboardOverview, PostViewSummary, SourceCount};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{serde_time, taxonomy::{CategoryWithCountDto, TagWithCountDto}};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostSummaryDto {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub view_count: i64,
    pub is_published: bool,
    #[serde(default, with = "serde_time::option")]
    pub published_at: Option<DateTime<Utc>>,
}

impl From<PostViewSummary> for PostSummaryDto {
    fn from(value: PostViewSummary) -> Self {
        Self {
            id: value.id.into(),
            title: value.title,
            slug: value.slug.into_inner(),
            view_count: value.view_count,
            is_published: value.published,
            published_at: value.published_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardOverviewDto {
    pub total_posts: u64,
    pub published_posts: u64,
    pub draft_posts: u64,
    pub total_views: u64,
    pub total_categories: u64,
    pub total_tags: u64,
    pub recent_views: u64,
}

impl From<DashboardOverview> for DashboardOverviewDto {
    fn from(value: DashboardOverview) -> Self {
        Self {
            total_posts: value.total_posts,
            published_posts: value.published_posts,
            draft_posts: value.draft_posts,
            total_views: value.total_views,
            total_categories: value.total_categories,
            total_tags: value.total_tags,
            recent_views: value.recent_views,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardDto {
    pub overview: DashboardOverviewDto,
    pub popular_posts: Vec<PostSummaryDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DailyViewsDto {
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub views: u64,
}

impl From<DailyViews> for DailyViewsDto {
    fn from(value: DailyViews) -> Self {
        Self {
            date: value.date,
            views: value.views,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReferrerCountDto {
    pub source: String,
    pub count: u64,
}

impl From<SourceCount> for ReferrerCountDto {
    fn from(value: SourceCount) -> Self {
        Self {
            source: value.source,
            count: value.count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BrowserCountDto {
    pub browser: String,
    pub count: u64,
}

impl From<SourceCount> for BrowserCountDto {
    fn from(value: SourceCount) -> Self {
        Self {
            browser: value.source,
            count: value.count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostViewStatsDto {
    pub total_views: u64,
    pub daily_views: Vec<DailyViewsDto>,
    pub referrers: Vec<ReferrerCountDto>,
    pub browsers: Vec<BrowserCountDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostAnalyticsDto {
    pub post: PostSummaryDto,
    pub analytics: PostViewStatsDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrendsDto {
    pub daily_views: Vec<DailyViewsDto>,
    pub top_categories: Vec<CategoryWithCountDto>,
    pub top_tags: Vec<TagWithCountDto>,
    pub recent_posts: Vec<PostSummaryDto>,
}

/// Request metadata recorded with a post view.
#[derive(Debug, Clone, Default)]
pub struct VisitorContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}
