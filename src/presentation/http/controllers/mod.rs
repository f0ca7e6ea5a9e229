// src/presentation/http/controllers/mod.rs
pub mod analytics;
pub mod auth;
pub mod categories;
pub mod media;
pub mod newsletter;
pub mod posts;
pub mod system;
pub mod tags;
