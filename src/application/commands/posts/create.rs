use super::{PostCommandService, category_ids, reading_time, tag_ids};
use crate::{
    application::{
        dto::{AuthenticatedUser, PostDto},
        error::ApplicationResult,
    },
    domain::{
        post::{NewPost, PostContent, PostTitle, PublishState},
        slug::SluggableKind,
    },
};

#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub meta_description: Option<String>,
    pub featured_image: Option<String>,
    pub reading_time: Option<i32>,
    pub publish: bool,
    pub category_ids: Vec<i64>,
    pub tag_ids: Vec<i64>,
}

impl CreatePostCommand {
    pub fn builder() -> CreatePostCommandBuilder {
        CreatePostCommandBuilder::default()
    }
}

#[derive(Default)]
pub struct CreatePostCommandBuilder {
    title: Option<String>,
    content: Option<String>,
    excerpt: Option<String>,
    meta_description: Option<String>,
    featured_image: Option<String>,
    reading_time: Option<i32>,
    publish: bool,
    category_ids: Vec<i64>,
    tag_ids: Vec<i64>,
}

impl CreatePostCommandBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn excerpt(mut self, excerpt: Option<String>) -> Self {
        self.excerpt = excerpt;
        self
    }

    pub fn meta_description(mut self, meta_description: Option<String>) -> Self {
        self.meta_description = meta_description;
        self
    }

    pub fn featured_image(mut self, featured_image: Option<String>) -> Self {
        self.featured_image = featured_image;
        self
    }

    pub fn reading_time(mut self, minutes: Option<i32>) -> Self {
        self.reading_time = minutes;
        self
    }

    pub fn publish(mut self, publish: bool) -> Self {
        self.publish = publish;
        self
    }

    pub fn category_ids(mut self, ids: Vec<i64>) -> Self {
        self.category_ids = ids;
        self
    }

    pub fn tag_ids(mut self, ids: Vec<i64>) -> Self {
        self.tag_ids = ids;
        self
    }

    pub fn build(self) -> Result<CreatePostCommand, &'static str> {
        Ok(CreatePostCommand {
            title: self.title.ok_or("title is required")?,
            content: self.content.ok_or("content is required")?,
            excerpt: self.excerpt,
            meta_description: self.meta_description,
            featured_image: self.featured_image,
            reading_time: self.reading_time,
            publish: self.publish,
            category_ids: self.category_ids,
            tag_ids: self.tag_ids,
        })
    }
}

impl PostCommandService {
    pub async fn create_post(
        &self,
        actor: &AuthenticatedUser,
        command: CreatePostCommand,
    ) -> ApplicationResult<PostDto> {
        actor.require("posts", "write")?;

        let title = PostTitle::new(command.title)?;
        let content = PostContent::new(command.content)?;
        let reading_time = reading_time(command.reading_time)?;
        let categories = category_ids(&command.category_ids)?;
        let tags = tag_ids(&command.tag_ids)?;
        let now = self.clock.now();

        let slug = self
            .slugs
            .allocate(SluggableKind::Post, title.as_str(), None)
            .await?;

        let new_post = NewPost {
            title,
            slug,
            content,
            excerpt: command.excerpt,
            meta_description: command.meta_description,
            featured_image: command.featured_image,
            reading_time,
            publish_state: PublishState::on_create(command.publish, now),
            author_id: actor.id,
            categories,
            tags,
            created_at: now,
        };

        let created = self.write_repo.insert(new_post).await.inspect_err(|err| {
            tracing::warn!(error = %err, "post insert rejected");
        })?;
        tracing::info!(post_id = created.id.0, slug = %created.slug, "post created");

        self.load(created.id).await
    }
}
