// src/domain/post/entity.rs
use crate::domain::category::{Category, CategoryId};
use crate::domain::post::value_objects::{PostContent, PostId, PostTitle, ReadingTime};
use crate::domain::slug::Slug;
use crate::domain::tag::{Tag, TagId};
use crate::domain::user::UserId;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct Post {
    pub id: PostId,
    pub title: PostTitle,
    pub slug: Slug,
    pub content: PostContent,
    pub excerpt: Option<String>,
    pub meta_description: Option<String>,
    pub featured_image: Option<String>,
    pub reading_time: Option<ReadingTime>,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: i64,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Publishing a draft stamps `published_at`; unpublishing keeps the
    /// previous stamp.
    pub fn publish_transition(&self, requested: bool, now: DateTime<Utc>) -> PublishState {
        let published_at = if requested && !self.published {
            Some(now)
        } else {
            self.published_at
        };
        PublishState {
            published: requested,
            published_at,
        }
    }

    pub fn is_visible_publicly(&self) -> bool {
        self.published
    }
}

/// A post with everything the read side shows next to it.
#[derive(Debug, Clone)]
pub struct PostDetails {
    pub post: Post,
    pub author_name: String,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishState {
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
}

impl PublishState {
    pub fn on_create(published: bool, now: DateTime<Utc>) -> Self {
        Self {
            published,
            published_at: published.then_some(now),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: PostTitle,
    pub slug: Slug,
    pub content: PostContent,
    pub excerpt: Option<String>,
    pub meta_description: Option<String>,
    pub featured_image: Option<String>,
    pub reading_time: Option<ReadingTime>,
    pub publish_state: PublishState,
    pub author_id: UserId,
    pub categories: BTreeSet<CategoryId>,
    pub tags: BTreeSet<TagId>,
    pub created_at: DateTime<Utc>,
}

/// Partial update. `None` leaves a field untouched; a `Some` link set fully
/// replaces the post's rows of that kind in the same transaction.
#[derive(Debug, Clone)]
pub struct PostUpdate {
    pub id: PostId,
    pub title: Option<PostTitle>,
    pub slug: Option<Slug>,
    pub content: Option<PostContent>,
    pub excerpt: Option<String>,
    pub meta_description: Option<String>,
    pub featured_image: Option<String>,
    pub reading_time: Option<ReadingTime>,
    pub publish_state: Option<PublishState>,
    pub categories: Option<BTreeSet<CategoryId>>,
    pub tags: Option<BTreeSet<TagId>>,
    pub updated_at: DateTime<Utc>,
}

impl PostUpdate {
    pub fn new(id: PostId, updated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: None,
            slug: None,
            content: None,
            excerpt: None,
            meta_description: None,
            featured_image: None,
            reading_time: None,
            publish_state: None,
            categories: None,
            tags: None,
            updated_at,
        }
    }

    pub fn with_title(mut self, title: PostTitle, slug: Slug) -> Self {
        self.title = Some(title);
        self.slug = Some(slug);
        self
    }

    pub fn with_content(mut self, content: PostContent) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_excerpt(mut self, excerpt: Option<String>) -> Self {
        self.excerpt = excerpt;
        self
    }

    pub fn with_meta_description(mut self, meta_description: Option<String>) -> Self {
        self.meta_description = meta_description;
        self
    }

    pub fn with_featured_image(mut self, featured_image: Option<String>) -> Self {
        self.featured_image = featured_image;
        self
    }

    pub fn with_reading_time(mut self, reading_time: Option<ReadingTime>) -> Self {
        self.reading_time = reading_time;
        self
    }

    pub fn with_publish_state(mut self, state: PublishState) -> Self {
        self.publish_state = Some(state);
        self
    }

    pub fn with_categories(mut self, categories: BTreeSet<CategoryId>) -> Self {
        self.categories = Some(categories);
        self
    }

    pub fn with_tags(mut self, tags: BTreeSet<TagId>) -> Self {
        self.tags = Some(tags);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublicationFilter {
    #[default]
    All,
    Published,
    Drafts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostOrder {
    #[default]
    NewestPublished,
    NewestCreated,
}

#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub publication: PublicationFilter,
    pub category: Option<Slug>,
    pub tag: Option<Slug>,
    /// Case-insensitive match over title, excerpt and content.
    pub search: Option<String>,
    pub order: PostOrder,
}

impl PostFilter {
    pub fn public() -> Self {
        Self {
            publication: PublicationFilter::Published,
            order: PostOrder::NewestPublished,
            ..Self::default()
        }
    }

    pub fn admin(publication: PublicationFilter) -> Self {
        Self {
            publication,
            order: PostOrder::NewestCreated,
            ..Self::default()
        }
    }
}
