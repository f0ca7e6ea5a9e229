pub mod analytics;
pub mod categories;
pub mod media;
pub mod newsletter;
pub mod posts;
pub mod tags;
pub mod users;
