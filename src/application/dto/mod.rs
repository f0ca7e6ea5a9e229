pub mod analytics;
pub mod auth;
pub mod media;
pub mod newsletter;
pub mod pagination;
pub mod posts;
pub mod serde_time;
pub mod taxonomy;
pub mod users;

pub use analytics::{
    BrowserCountDto, DailyViewsDto, DashboardDto, DashboardOverviewDto, PostAnalyticsDto,
    PostSummaryDto, PostViewStatsDto, ReferrerCountDto, TrendsDto, VisitorContext,
};
pub use auth::{AuthTokenDto, AuthenticatedUser, LoginResultDto, TokenSubject};
pub use media::{MediaDto, MediaPostDto};
pub use newsletter::{
    BulkActionResultDto, MonthlyCountDto, NewsletterOverviewDto, NewsletterStatsDto,
    SubscriberDto, SubscriptionResultDto,
};
pub use pagination::PaginatedResult;
pub use posts::{AuthorDto, LinkedTermDto, PostDto, PostLinksDto};
pub use taxonomy::{
    CategoryDetailDto, CategoryDto, CategoryWithCountDto, TagDetailDto, TagDto, TagWithCountDto,
};
pub use users::{CapabilityView, UserDto, UserProfileDto};
