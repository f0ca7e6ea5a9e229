// src/infrastructure/repositories/mod.rs
mod analytics;
mod categories;
mod error;
mod links;
mod media;
mod newsletter;
mod posts;
mod slugs;
mod tags;
mod users;

pub use analytics::PostgresAnalyticsRepository;
pub use categories::PostgresCategoryRepository;
pub use error::map_sqlx;
pub(crate) use error::{contains_pattern, to_count};
pub use links::PostgresPostLinkRepository;
pub use media::PostgresMediaRepository;
pub use newsletter::PostgresNewsletterRepository;
pub use posts::{PostgresPostReadRepository, PostgresPostWriteRepository};
pub use slugs::PostgresSlugRegistry;
pub use tags::PostgresTagRepository;
pub use users::PostgresUserRepository;
