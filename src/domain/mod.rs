pub mod analytics;
pub mod category;
pub mod email;
pub mod errors;
pub mod media;
pub mod newsletter;
pub mod pagination;
pub mod post;
pub mod slug;
pub mod tag;
pub mod user;
