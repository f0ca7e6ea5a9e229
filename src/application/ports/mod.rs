// src/application/ports/mod.rs
//! Services the application layer needs from the outside world. Slug
//! generation is a domain port and lives in `domain::slug`.
pub mod security;
pub mod storage;
pub mod time;
