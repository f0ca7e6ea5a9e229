// src/application/queries/analytics.rs
use std::sync::Arc;

use chrono::Duration;

use crate::{
    application::{
        dto::{
            AuthenticatedUser, DashboardDto, PostAnalyticsDto, PostViewStatsDto, TrendsDto,
        },
        error::{ApplicationError, ApplicationResult},
        ports::time::Clock,
    },
    domain::{
        analytics::{AnalyticsRepository, browser_breakdown, referrer_breakdown},
        category::CategoryRepository,
        post::PostId,
        tag::TagRepository,
    },
};

const DASHBOARD_RECENT_DAYS: i64 = 30;
const POPULAR_POSTS: u32 = 10;
const MAX_RECENT_VIEWS: u32 = 1000;
const TOP_CATEGORIES: usize = 5;
const TOP_TAGS: usize = 10;
const TRENDING_POSTS: u32 = 5;
pub const DEFAULT_POST_WINDOW_DAYS: u32 = 30;
pub const DEFAULT_TREND_PERIOD_DAYS: u32 = 7;
const MAX_WINDOW_DAYS: u32 = 365;

pub struct AnalyticsQueryService {
    analytics: Arc<dyn AnalyticsRepository>,
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
    clock: Arc<dyn Clock>,
}

fn window(days: Option<u32>, default: u32) -> ApplicationResult<Duration> {
    let days = days.unwrap_or(default);
    if days == 0 || days > MAX_WINDOW_DAYS {
        return Err(ApplicationError::validation(format!(
            "window must be between 1 and {MAX_WINDOW_DAYS} days"
        )));
    }
    Ok(Duration::days(i64::from(days)))
}

impl AnalyticsQueryService {
    pub fn new(
        analytics: Arc<dyn AnalyticsRepository>,
        categories: Arc<dyn CategoryRepository>,
        tags: Arc<dyn TagRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            analytics,
            categories,
            tags,
            clock,
        }
    }

    pub async fn dashboard(&self, actor: &AuthenticatedUser) -> ApplicationResult<DashboardDto> {
        actor.require("analytics", "read")?;

        let since = self.clock.now() - Duration::days(DASHBOARD_RECENT_DAYS);
        let overview = self.analytics.overview(since).await?;
        let popular = self.analytics.popular_posts(POPULAR_POSTS).await?;

        Ok(DashboardDto {
            overview: overview.into(),
            popular_posts: popular.into_iter().map(Into::into).collect(),
        })
    }

    pub async fn post_analytics(
        &self,
        actor: &AuthenticatedUser,
        post_id: i64,
        days: Option<u32>,
    ) -> ApplicationResult<PostAnalyticsDto> {
        actor.require("analytics", "read")?;

        let post_id = PostId::new(post_id)?;
        let since = self.clock.now() - window(days, DEFAULT_POST_WINDOW_DAYS)?;

        let post = self
            .analytics
            .post_summary(post_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("post not found"))?;
        let views = self
            .analytics
            .recent_views(post_id, since, MAX_RECENT_VIEWS)
            .await?;
        let daily = self.analytics.daily_views(Some(post_id), since).await?;

        Ok(PostAnalyticsDto {
            post: post.into(),
            analytics: PostViewStatsDto {
                total_views: views.len() as u64,
                daily_views: daily.into_iter().map(Into::into).collect(),
                referrers: referrer_breakdown(&views)
                    .into_iter()
                    .map(Into::into)
                    .collect(),
                browsers: browser_breakdown(&views)
                    .into_iter()
                    .map(Into::into)
                    .collect(),
            },
        })
    }

    pub async fn trends(
        &self,
        actor: &AuthenticatedUser,
        period: Option<u32>,
    ) -> ApplicationResult<TrendsDto> {
        actor.require("analytics", "read")?;

        let since = self.clock.now() - window(period, DEFAULT_TREND_PERIOD_DAYS)?;
        let daily = self.analytics.daily_views(None, since).await?;

        let mut categories = self.categories.list_with_post_counts().await?;
        categories.sort_by(|a, b| b.post_count.cmp(&a.post_count));
        categories.truncate(TOP_CATEGORIES);

        let mut tags = self.tags.list_with_post_counts().await?;
        tags.sort_by(|a, b| b.post_count.cmp(&a.post_count));
        tags.truncate(TOP_TAGS);

        let recent = self
            .analytics
            .recent_popular_posts(since, TRENDING_POSTS)
            .await?;

        Ok(TrendsDto {
            daily_views: daily.into_iter().map(Into::into).collect(),
            top_categories: categories.into_iter().map(Into::into).collect(),
            top_tags: tags.into_iter().map(Into::into).collect(),
            recent_posts: recent.into_iter().map(Into::into).collect(),
        })
    }
}
