// src/application/commands/tags.rs
use std::sync::Arc;

use crate::{
    application::{
        dto::{AuthenticatedUser, TagDto},
        error::{ApplicationError, ApplicationResult},
        ports::time::Clock,
    },
    domain::{
        slug::{SlugAllocator, SluggableKind},
        tag::{NewTag, TagId, TagName, TagRepository, TagUpdate},
    },
};

pub struct TagCommandService {
    repo: Arc<dyn TagRepository>,
    slugs: Arc<SlugAllocator>,
    clock: Arc<dyn Clock>,
}

impl TagCommandService {
    pub fn new(repo: Arc<dyn TagRepository>, slugs: Arc<SlugAllocator>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, slugs, clock }
    }

    pub async fn create_tag(&self, actor: &AuthenticatedUser, name: String) -> ApplicationResult<TagDto> {
        actor.require("taxonomy", "write")?;

        let name = TagName::new(name)?;
        let slug = self
            .slugs
            .allocate(SluggableKind::Tag, name.as_str(), None)
            .await?;

        let created = self
            .repo
            .insert(NewTag {
                name,
                slug,
                created_at: self.clock.now(),
            })
            .await?;
        tracing::info!(tag_id = created.id.0, slug = %created.slug, "tag created");
        Ok(created.into())
    }

    /// Tags only carry a name, so renaming is the whole update.
    pub async fn rename_tag(
        &self,
        actor: &AuthenticatedUser,
        id: i64,
        name: String,
    ) -> ApplicationResult<TagDto> {
        actor.require("taxonomy", "write")?;

        let id = TagId::new(id)?;
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("tag not found"))?;

        let name = TagName::new(name)?;
        let slug = if name == existing.name {
            existing.slug
        } else {
            self.slugs
                .allocate(SluggableKind::Tag, name.as_str(), Some(id.into()))
                .await?
        };

        let updated = self
            .repo
            .update(TagUpdate {
                id,
                name,
                slug,
                updated_at: self.clock.now(),
            })
            .await?;
        tracing::info!(tag_id = updated.id.0, slug = %updated.slug, "tag updated");
        Ok(updated.into())
    }

    pub async fn delete_tag(&self, actor: &AuthenticatedUser, id: i64) -> ApplicationResult<()> {
        actor.require("taxonomy", "write")?;

        let id = TagId::new(id)?;
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(ApplicationError::not_found("tag not found"));
        }

        let linked = self.repo.count_linked_posts(id).await?;
        if linked > 0 {
            return Err(ApplicationError::validation(format!(
                "cannot delete tag with {linked} associated posts"
            )));
        }

        self.repo.delete(id).await?;
        tracing::info!(tag_id = id.0, "tag deleted");
        Ok(())
    }
}
