// src/application/commands/media.rs
use std::sync::Arc;

use crate::{
    application::{
        dto::{AuthenticatedUser, MediaDto},
        error::{ApplicationError, ApplicationResult},
        ports::storage::MediaFiles,
    },
    domain::{
        media::{MediaId, MediaRepository, MediaUpdate},
        post::PostId,
    },
};

/// `post_id: Some(None)` detaches the item; `None` keeps the current post.
#[derive(Debug, Clone, Default)]
pub struct UpdateMediaCommand {
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub post_id: Option<Option<i64>>,
}

pub struct MediaCommandService {
    repo: Arc<dyn MediaRepository>,
    files: Arc<dyn MediaFiles>,
}

impl MediaCommandService {
    pub fn new(repo: Arc<dyn MediaRepository>, files: Arc<dyn MediaFiles>) -> Self {
        Self { repo, files }
    }

    pub async fn update_media(
        &self,
        actor: &AuthenticatedUser,
        id: i64,
        command: UpdateMediaCommand,
    ) -> ApplicationResult<MediaDto> {
        actor.require("media", "manage")?;

        let id = MediaId::new(id)?;
        let post_id = command
            .post_id
            .map(|target| target.map(PostId::new).transpose())
            .transpose()?;
        let update = MediaUpdate {
            alt_text: command.alt_text,
            caption: command.caption,
            post_id,
        };

        if update.is_empty() {
            let current = self
                .repo
                .find_by_id(id)
                .await?
                .ok_or_else(|| ApplicationError::not_found("media not found"))?;
            return Ok(current.into());
        }

        let updated = self.repo.update(id, update).await?;
        tracing::info!(media_id = updated.id.0, "media metadata updated");
        Ok(updated.into())
    }

    /// Removes the record, then the stored file. A file that cannot be
    /// removed is logged and left behind.
    pub async fn delete_media(&self, actor: &AuthenticatedUser, id: i64) -> ApplicationResult<()> {
        actor.require("media", "manage")?;

        let id = MediaId::new(id)?;
        let removed = self
            .repo
            .delete(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("media not found"))?;

        if let Err(err) = self.files.remove(&removed.filename).await {
            tracing::warn!(
                media_id = id.0,
                filename = %removed.filename,
                error = %err,
                "media file left on disk"
            );
        }
        tracing::info!(media_id = id.0, "media deleted");
        Ok(())
    }
}
