// src/application/services/mod.rs
use std::sync::Arc;

use crate::{
    application::{
        ApplicationResult,
        commands::{
            analytics::AnalyticsCommandService, categories::CategoryCommandService,
            media::MediaCommandService, newsletter::NewsletterCommandService,
            posts::PostCommandService, tags::TagCommandService, users::UserCommandService,
        },
        dto::AuthenticatedUser,
        ports::{
            security::{PasswordHasher, TokenManager},
            storage::MediaFiles,
            time::Clock,
        },
        queries::{
            analytics::AnalyticsQueryService, media::MediaQueryService,
            newsletter::NewsletterQueryService,
            posts::PostQueryService, taxonomy::TaxonomyQueryService, users::UserQueryService,
        },
    },
    domain::{
        analytics::AnalyticsRepository,
        category::CategoryRepository,
        media::MediaRepository,
        newsletter::NewsletterRepository,
        post::{PostLinkReplacer, PostLinkRepository, PostReadRepository, PostWriteRepository},
        slug::{SlugAllocator, SlugGenerator, SlugRegistry},
        tag::TagRepository,
        user::UserRepository,
    },
};

/// Everything the services are built from. Constructed once at start-up.
pub struct ApplicationDependencies {
    pub users: Arc<dyn UserRepository>,
    pub post_writes: Arc<dyn PostWriteRepository>,
    pub post_reads: Arc<dyn PostReadRepository>,
    pub post_links: Arc<dyn PostLinkRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub slug_registry: Arc<dyn SlugRegistry>,
    pub newsletter: Arc<dyn NewsletterRepository>,
    pub analytics: Arc<dyn AnalyticsRepository>,
    pub media: Arc<dyn MediaRepository>,
    pub media_files: Arc<dyn MediaFiles>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub token_manager: Arc<dyn TokenManager>,
    pub clock: Arc<dyn Clock>,
    pub slugger: Arc<dyn SlugGenerator>,
}

pub struct ApplicationServices {
    pub user_commands: Arc<UserCommandService>,
    pub user_queries: Arc<UserQueryService>,
    pub post_commands: Arc<PostCommandService>,
    pub post_queries: Arc<PostQueryService>,
    pub category_commands: Arc<CategoryCommandService>,
    pub tag_commands: Arc<TagCommandService>,
    pub taxonomy_queries: Arc<TaxonomyQueryService>,
    pub newsletter_commands: Arc<NewsletterCommandService>,
    pub newsletter_queries: Arc<NewsletterQueryService>,
    pub analytics_commands: Arc<AnalyticsCommandService>,
    pub analytics_queries: Arc<AnalyticsQueryService>,
    pub media_commands: Arc<MediaCommandService>,
    pub media_queries: Arc<MediaQueryService>,
    token_manager: Arc<dyn TokenManager>,
}

impl ApplicationServices {
    pub fn new(deps: ApplicationDependencies) -> Self {
        let slugs = Arc::new(SlugAllocator::new(
            Arc::clone(&deps.slug_registry),
            Arc::clone(&deps.slugger),
        ));
        let link_replacer = Arc::new(PostLinkReplacer::new(
            Arc::clone(&deps.post_reads),
            Arc::clone(&deps.post_links),
        ));

        let user_commands = Arc::new(UserCommandService::new(
            Arc::clone(&deps.users),
            Arc::clone(&deps.password_hasher),
            Arc::clone(&deps.token_manager),
            Arc::clone(&deps.clock),
        ));
        let user_queries = Arc::new(UserQueryService::new(Arc::clone(&deps.users)));

        let post_commands = Arc::new(PostCommandService::new(
            Arc::clone(&deps.post_writes),
            Arc::clone(&deps.post_reads),
            Arc::clone(&slugs),
            link_replacer,
            Arc::clone(&deps.clock),
        ));
        let post_queries = Arc::new(PostQueryService::new(Arc::clone(&deps.post_reads)));

        let category_commands = Arc::new(CategoryCommandService::new(
            Arc::clone(&deps.categories),
            Arc::clone(&slugs),
            Arc::clone(&deps.clock),
        ));
        let tag_commands = Arc::new(TagCommandService::new(
            Arc::clone(&deps.tags),
            slugs,
            Arc::clone(&deps.clock),
        ));
        let taxonomy_queries = Arc::new(TaxonomyQueryService::new(
            Arc::clone(&deps.categories),
            Arc::clone(&deps.tags),
            Arc::clone(&deps.post_reads),
        ));

        let newsletter_commands = Arc::new(NewsletterCommandService::new(
            Arc::clone(&deps.newsletter),
            Arc::clone(&deps.clock),
        ));
        let newsletter_queries = Arc::new(NewsletterQueryService::new(
            Arc::clone(&deps.newsletter),
            Arc::clone(&deps.clock),
        ));

        let analytics_commands = Arc::new(AnalyticsCommandService::new(
            Arc::clone(&deps.analytics),
            Arc::clone(&deps.post_reads),
            Arc::clone(&deps.post_writes),
            Arc::clone(&deps.clock),
        ));
        let analytics_queries = Arc::new(AnalyticsQueryService::new(
            Arc::clone(&deps.analytics),
            Arc::clone(&deps.categories),
            Arc::clone(&deps.tags),
            Arc::clone(&deps.clock),
        ));

        let media_commands = Arc::new(MediaCommandService::new(
            Arc::clone(&deps.media),
            Arc::clone(&deps.media_files),
        ));
        let media_queries = Arc::new(MediaQueryService::new(Arc::clone(&deps.media)));

        Self {
            user_commands,
            user_queries,
            post_commands,
            post_queries,
            category_commands,
            tag_commands,
            taxonomy_queries,
            newsletter_commands,
            newsletter_queries,
            analytics_commands,
            analytics_queries,
            media_commands,
            media_queries,
            token_manager: deps.token_manager,
        }
    }

    pub fn token_manager(&self) -> Arc<dyn TokenManager> {
        Arc::clone(&self.token_manager)
    }

    /// Verifies a raw bearer token and returns its principal.
    pub async fn authenticate(&self, token: &str) -> ApplicationResult<AuthenticatedUser> {
        self.token_manager.authenticate(token).await
    }
}
