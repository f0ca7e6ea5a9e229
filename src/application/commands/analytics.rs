// src/application/commands/analytics.rs
use std::sync::Arc;

use crate::{
    application::{
        dto::VisitorContext,
        error::{ApplicationError, ApplicationResult},
        ports::time::Clock,
    },
    domain::{
        analytics::{AnalyticsRepository, NewPostView},
        post::{PostId, PostReadRepository, PostWriteRepository},
    },
};

pub struct AnalyticsCommandService {
    analytics: Arc<dyn AnalyticsRepository>,
    posts: Arc<dyn PostReadRepository>,
    post_writes: Arc<dyn PostWriteRepository>,
    clock: Arc<dyn Clock>,
}

impl AnalyticsCommandService {
    pub fn new(
        analytics: Arc<dyn AnalyticsRepository>,
        posts: Arc<dyn PostReadRepository>,
        post_writes: Arc<dyn PostWriteRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            analytics,
            posts,
            post_writes,
            clock,
        }
    }

    /// Counts a read of a published post and records the visit.
    pub async fn record_read(&self, post_id: PostId, visitor: VisitorContext) -> ApplicationResult<()> {
        self.post_writes.increment_view_count(post_id).await?;
        self.record(post_id, visitor).await
    }

    /// Public tracking beacon. Unknown and unpublished posts look the same.
    pub async fn track(&self, post_id: i64, visitor: VisitorContext) -> ApplicationResult<()> {
        let post_id = PostId::new(post_id)?;
        let published = self
            .posts
            .find_by_id(post_id)
            .await?
            .is_some_and(|details| details.post.is_visible_publicly());
        if !published {
            return Err(ApplicationError::not_found("post not found"));
        }
        self.record(post_id, visitor).await
    }

    async fn record(&self, post_id: PostId, visitor: VisitorContext) -> ApplicationResult<()> {
        self.analytics
            .record_view(NewPostView {
                post_id,
                ip_address: visitor.ip_address,
                user_agent: visitor.user_agent,
                referrer: visitor.referrer,
                viewed_at: self.clock.now(),
            })
            .await?;
        tracing::debug!(post_id = post_id.0, "post view recorded");
        Ok(())
    }
}
