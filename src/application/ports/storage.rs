// src/application/ports/storage.rs
use crate::application::ApplicationResult;
use async_trait::async_trait;

/// Where uploaded media bytes live.
#[async_trait]
pub trait MediaFiles: Send + Sync {
    /// Removing a file that is already gone succeeds.
    async fn remove(&self, filename: &str) -> ApplicationResult<()>;
}
