// src/application/ports/time.rs
use chrono::{DateTime, Utc};

/// Source of "now" for publication stamps, subscription dates and the
/// analytics windows.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
