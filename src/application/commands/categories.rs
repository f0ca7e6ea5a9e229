// src/application/commands/categories.rs
use std::sync::Arc;

use crate::{
    application::{
        dto::{AuthenticatedUser, CategoryDto},
        error::{ApplicationError, ApplicationResult},
        ports::time::Clock,
    },
    domain::{
        category::{CategoryId, CategoryName, CategoryRepository, CategoryUpdate, NewCategory},
        slug::{SlugAllocator, SluggableKind},
    },
};

pub struct CreateCategoryCommand {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

pub struct UpdateCategoryCommand {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

pub struct CategoryCommandService {
    repo: Arc<dyn CategoryRepository>,
    slugs: Arc<SlugAllocator>,
    clock: Arc<dyn Clock>,
}

impl CategoryCommandService {
    pub fn new(
        repo: Arc<dyn CategoryRepository>,
        slugs: Arc<SlugAllocator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { repo, slugs, clock }
    }

    pub async fn create_category(
        &self,
        actor: &AuthenticatedUser,
        command: CreateCategoryCommand,
    ) -> ApplicationResult<CategoryDto> {
        actor.require("taxonomy", "write")?;

        let name = CategoryName::new(command.name)?;
        let slug = self
            .slugs
            .allocate(SluggableKind::Category, name.as_str(), None)
            .await?;

        let created = self
            .repo
            .insert(NewCategory {
                name,
                slug,
                description: command.description,
                color: command.color,
                created_at: self.clock.now(),
            })
            .await?;
        tracing::info!(category_id = created.id.0, slug = %created.slug, "category created");
        Ok(created.into())
    }

    pub async fn update_category(
        &self,
        actor: &AuthenticatedUser,
        command: UpdateCategoryCommand,
    ) -> ApplicationResult<CategoryDto> {
        actor.require("taxonomy", "write")?;

        let id = CategoryId::new(command.id)?;
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("category not found"))?;

        let mut update = CategoryUpdate::new(id, self.clock.now())
            .with_description(command.description)
            .with_color(command.color);

        if let Some(name) = command.name {
            let name = CategoryName::new(name)?;
            if name != existing.name {
                let slug = self
                    .slugs
                    .allocate(SluggableKind::Category, name.as_str(), Some(id.into()))
                    .await?;
                update = update.with_name(name, slug);
            }
        }

        let updated = self.repo.update(update).await?;
        tracing::info!(category_id = updated.id.0, slug = %updated.slug, "category updated");
        Ok(updated.into())
    }

    /// Refused while any post, draft or published, is linked.
    pub async fn delete_category(&self, actor: &AuthenticatedUser, id: i64) -> ApplicationResult<()> {
        actor.require("taxonomy", "write")?;

        let id = CategoryId::new(id)?;
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(ApplicationError::not_found("category not found"));
        }

        let linked = self.repo.count_linked_posts(id).await?;
        if linked > 0 {
            return Err(ApplicationError::validation(format!(
                "cannot delete category with {linked} associated posts"
            )));
        }

        self.repo.delete(id).await?;
        tracing::info!(category_id = id.0, "category deleted");
        Ok(())
    }
}
