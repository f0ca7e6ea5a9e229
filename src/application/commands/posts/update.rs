use super::{PostCommandService, category_ids, reading_time, tag_ids};
use crate::{
    application::{
        dto::{AuthenticatedUser, PostDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        post::{PostContent, PostId, PostTitle, PostUpdate},
        slug::SluggableKind,
    },
};

/// `None` fields are left unchanged. Supplied id lists replace the current
/// links of that kind.
#[derive(Debug, Clone, Default)]
pub struct UpdatePostCommand {
    pub id: i64,
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub meta_description: Option<String>,
    pub featured_image: Option<String>,
    pub reading_time: Option<i32>,
    pub publish: Option<bool>,
    pub category_ids: Option<Vec<i64>>,
    pub tag_ids: Option<Vec<i64>>,
}

impl PostCommandService {
    pub async fn update_post(
        &self,
        actor: &AuthenticatedUser,
        command: UpdatePostCommand,
    ) -> ApplicationResult<PostDto> {
        actor.require("posts", "write")?;

        let id = PostId::new(command.id)?;
        let existing = self
            .read_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("post not found"))?
            .post;

        let now = self.clock.now();
        let mut update = PostUpdate::new(id, now)
            .with_excerpt(command.excerpt)
            .with_meta_description(command.meta_description)
            .with_featured_image(command.featured_image)
            .with_reading_time(reading_time(command.reading_time)?);

        if let Some(title) = command.title {
            let title = PostTitle::new(title)?;
            if title != existing.title {
                let slug = self
                    .slugs
                    .allocate(SluggableKind::Post, title.as_str(), Some(id.into()))
                    .await?;
                update = update.with_title(title, slug);
            }
        }

        if let Some(content) = command.content {
            update = update.with_content(PostContent::new(content)?);
        }

        if let Some(publish) = command.publish {
            update = update.with_publish_state(existing.publish_transition(publish, now));
        }

        if let Some(ids) = command.category_ids {
            update = update.with_categories(category_ids(&ids)?);
        }

        if let Some(ids) = command.tag_ids {
            update = update.with_tags(tag_ids(&ids)?);
        }

        let updated = self.write_repo.update(update).await.inspect_err(|err| {
            tracing::warn!(post_id = id.0, error = %err, "post update rejected");
        })?;
        tracing::info!(post_id = updated.id.0, slug = %updated.slug, "post updated");

        self.load(updated.id).await
    }
}
