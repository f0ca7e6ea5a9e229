// tests/support/memory.rs
use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use starlite_blog::domain::{
    analytics::{
        AnalyticsRepository, DailyViews, DashboardOverview, NewPostView, PostViewSummary,
        RecordedView,
    },
    category::{Category, CategoryId, CategoryRepository, CategoryUpdate, CategoryWithCount, NewCategory},
    email::EmailAddress,
    errors::{DomainError, DomainResult},
    media::{AttachedPost, Media, MediaId, MediaRepository, MediaUpdate},
    newsletter::{
        BulkAction, MonthlyCount, NewsletterRepository, Subscriber, SubscriberId, SubscriberStatus,
    },
    pagination::PageRequest,
    post::{
        LinkKind, LinkTargets, NewPost, Post, PostDetails, PostFilter, PostId, PostLinkRepository,
        PostOrder, PostReadRepository, PostUpdate, PostWriteRepository, PublicationFilter,
    },
    slug::{Slug, SlugRegistry, SluggableKind},
    tag::{NewTag, Tag, TagId, TagRepository, TagUpdate, TagWithCount},
    user::{NewUser, PasswordHash, User, UserId, UserRepository},
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{
    Arc, Mutex, MutexGuard,
    atomic::{AtomicUsize, Ordering},
};

#[derive(Default)]
struct State {
    next_id: i64,
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    post_categories: BTreeMap<i64, BTreeSet<i64>>,
    post_tags: BTreeMap<i64, BTreeSet<i64>>,
    categories: BTreeMap<i64, Category>,
    tags: BTreeMap<i64, Tag>,
    subscribers: BTreeMap<i64, Subscriber>,
    views: Vec<NewPostView>,
    media: BTreeMap<i64, StoredMedia>,
}

/// Media row; the post reference is resolved on read like the SQL join.
#[derive(Clone)]
struct StoredMedia {
    media: Media,
    post_id: Option<i64>,
}

/// Upload metadata as the external uploader would insert it.
#[derive(Debug, Clone)]
pub struct MediaSeed {
    pub original_name: String,
    pub mime_type: String,
    pub size: i64,
    pub post_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn resolve_media(&self, stored: &StoredMedia) -> Media {
        let post = stored
            .post_id
            .and_then(|id| self.posts.get(&id))
            .map(|post| AttachedPost {
                id: post.id,
                title: post.title.as_str().to_string(),
                slug: post.slug.clone(),
            });
        Media {
            post,
            ..stored.media.clone()
        }
    }

    fn slug_owner(&self, kind: SluggableKind, slug: &Slug) -> Option<i64> {
        match kind {
            SluggableKind::Post => self
                .posts
                .values()
                .find(|p| &p.slug == slug)
                .map(|p| p.id.0),
            SluggableKind::Category => self
                .categories
                .values()
                .find(|c| &c.slug == slug)
                .map(|c| c.id.0),
            SluggableKind::Tag => self
                .tags
                .values()
                .find(|t| &t.slug == slug)
                .map(|t| t.id.0),
        }
    }

    /// Mirrors the unique slug constraints.
    fn ensure_slug_free(&self, kind: SluggableKind, slug: &Slug, owner: Option<i64>) -> DomainResult<()> {
        match self.slug_owner(kind, slug) {
            Some(id) if Some(id) != owner => Err(DomainError::Conflict(format!(
                "{kind} slug already exists"
            ))),
            _ => Ok(()),
        }
    }

    fn links_mut(&mut self, kind: LinkKind) -> &mut BTreeMap<i64, BTreeSet<i64>> {
        match kind {
            LinkKind::Category => &mut self.post_categories,
            LinkKind::Tag => &mut self.post_tags,
        }
    }

    /// Mirrors the foreign keys on the join tables.
    fn write_links(&mut self, post_id: i64, targets: &LinkTargets) -> DomainResult<()> {
        if !self.posts.contains_key(&post_id) {
            return Err(DomainError::NotFound("post not found".into()));
        }
        let ids = targets.raw_ids();
        let known = |id: &i64| match targets.kind() {
            LinkKind::Category => self.categories.contains_key(id),
            LinkKind::Tag => self.tags.contains_key(id),
        };
        if let Some(missing) = ids.iter().find(|id| !known(id)) {
            return Err(DomainError::InvalidReference(format!(
                "{} {missing} does not exist",
                targets.kind()
            )));
        }
        self.links_mut(targets.kind()).insert(post_id, ids);
        Ok(())
    }

    fn details(&self, post: &Post) -> PostDetails {
        let author_name = self
            .users
            .get(&post.author_id.0)
            .map(|u| u.name.as_str().to_string())
            .unwrap_or_default();
        let mut categories: Vec<Category> = self
            .post_categories
            .get(&post.id.0)
            .into_iter()
            .flatten()
            .filter_map(|id| self.categories.get(id).cloned())
            .collect();
        categories.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        let mut tags: Vec<Tag> = self
            .post_tags
            .get(&post.id.0)
            .into_iter()
            .flatten()
            .filter_map(|id| self.tags.get(id).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));

        PostDetails {
            post: post.clone(),
            author_name,
            categories,
            tags,
        }
    }

    fn published_links(&self, links: &BTreeMap<i64, BTreeSet<i64>>, target: i64) -> u64 {
        links
            .iter()
            .filter(|(post_id, ids)| {
                ids.contains(&target) && self.posts.get(post_id).is_some_and(|p| p.published)
            })
            .count() as u64
    }

    fn summary(post: &Post) -> PostViewSummary {
        PostViewSummary {
            id: post.id,
            title: post.title.as_str().to_string(),
            slug: post.slug.clone(),
            view_count: post.view_count,
            published: post.published,
            published_at: post.published_at,
        }
    }
}

/// Single in-process store behind every repository port.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
    lookups: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory store poisoned")
    }

    /// Number of slug existence checks served so far.
    pub fn slug_lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn view_count(&self) -> usize {
        self.lock().views.len()
    }

    pub fn last_view(&self) -> Option<NewPostView> {
        self.lock().views.last().cloned()
    }

    /// Inserts a media record directly; uploads are outside the API.
    pub fn seed_media(&self, seed: MediaSeed) -> i64 {
        let mut state = self.lock();
        let id = state.next_id();
        let filename = format!("file-{}-{id}.png", seed.created_at.timestamp());
        let media = Media {
            id: MediaId(id),
            url: format!("/uploads/{filename}"),
            filename,
            original_name: seed.original_name,
            mime_type: seed.mime_type,
            size: seed.size,
            alt_text: String::new(),
            caption: String::new(),
            post: None,
            created_at: seed.created_at,
        };
        state.media.insert(
            id,
            StoredMedia {
                media,
                post_id: seed.post_id,
            },
        );
        id
    }

    pub fn media_count(&self) -> usize {
        self.lock().media.len()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn count(&self) -> DomainResult<u64> {
        Ok(self.lock().users.len() as u64)
    }

    async fn insert(&self, new_user: NewUser) -> DomainResult<User> {
        let mut state = self.lock();
        if state.users.values().any(|u| u.email == new_user.email) {
            return Err(DomainError::Conflict("email already registered".into()));
        }
        let id = state.next_id();
        let user = User {
            id: UserId(id),
            email: new_user.email,
            name: new_user.name,
            password_hash: new_user.password_hash,
            role: new_user.role,
            created_at: new_user.created_at,
        };
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> DomainResult<Option<User>> {
        Ok(self.lock().users.values().find(|u| &u.email == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>> {
        Ok(self.lock().users.get(&id.0).cloned())
    }

    async fn update_password(&self, id: UserId, password_hash: PasswordHash) -> DomainResult<()> {
        let mut state = self.lock();
        let user = state
            .users
            .get_mut(&id.0)
            .ok_or_else(|| DomainError::NotFound("user not found".into()))?;
        user.set_password(password_hash);
        Ok(())
    }
}

#[async_trait]
impl SlugRegistry for MemoryStore {
    async fn exists_by_slug(
        &self,
        kind: SluggableKind,
        slug: &Slug,
        exclude_id: Option<i64>,
    ) -> DomainResult<bool> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let owner = self.lock().slug_owner(kind, slug);
        Ok(owner.is_some_and(|id| Some(id) != exclude_id))
    }
}

#[async_trait]
impl PostWriteRepository for MemoryStore {
    async fn insert(&self, new_post: NewPost) -> DomainResult<Post> {
        let mut state = self.lock();
        state.ensure_slug_free(SluggableKind::Post, &new_post.slug, None)?;
        let id = state.next_id();
        let post = Post {
            id: PostId(id),
            title: new_post.title,
            slug: new_post.slug,
            content: new_post.content,
            excerpt: new_post.excerpt,
            meta_description: new_post.meta_description,
            featured_image: new_post.featured_image,
            reading_time: new_post.reading_time,
            published: new_post.publish_state.published,
            published_at: new_post.publish_state.published_at,
            view_count: 0,
            author_id: new_post.author_id,
            created_at: new_post.created_at,
            updated_at: new_post.created_at,
        };
        state.posts.insert(id, post.clone());

        let categories = LinkTargets::Categories(new_post.categories);
        let tags = LinkTargets::Tags(new_post.tags);
        if let Err(err) = state
            .write_links(id, &categories)
            .and_then(|_| state.write_links(id, &tags))
        {
            state.posts.remove(&id);
            state.post_categories.remove(&id);
            state.post_tags.remove(&id);
            return Err(err);
        }
        Ok(post)
    }

    async fn update(&self, update: PostUpdate) -> DomainResult<Post> {
        let mut state = self.lock();
        let id = update.id.0;
        let mut post = state
            .posts
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound("post not found".into()))?;
        if let Some(slug) = &update.slug {
            state.ensure_slug_free(SluggableKind::Post, slug, Some(id))?;
        }

        let previous = (
            state.posts.get(&id).cloned(),
            state.post_categories.get(&id).cloned(),
            state.post_tags.get(&id).cloned(),
        );

        if let Some(title) = update.title {
            post.title = title;
        }
        if let Some(slug) = update.slug {
            post.slug = slug;
        }
        if let Some(content) = update.content {
            post.content = content;
        }
        if update.excerpt.is_some() {
            post.excerpt = update.excerpt;
        }
        if update.meta_description.is_some() {
            post.meta_description = update.meta_description;
        }
        if update.featured_image.is_some() {
            post.featured_image = update.featured_image;
        }
        if update.reading_time.is_some() {
            post.reading_time = update.reading_time;
        }
        if let Some(publish) = update.publish_state {
            post.published = publish.published;
            post.published_at = publish.published_at;
        }
        post.updated_at = update.updated_at;
        state.posts.insert(id, post.clone());

        let mut result = Ok(());
        if let Some(categories) = update.categories {
            result = state.write_links(id, &LinkTargets::Categories(categories));
        }
        if let (Ok(()), Some(tags)) = (&result, update.tags) {
            result = state.write_links(id, &LinkTargets::Tags(tags));
        }
        if let Err(err) = result {
            let (old_post, old_categories, old_tags) = previous;
            if let Some(old_post) = old_post {
                state.posts.insert(id, old_post);
            }
            match old_categories {
                Some(ids) => state.post_categories.insert(id, ids),
                None => state.post_categories.remove(&id),
            };
            match old_tags {
                Some(ids) => state.post_tags.insert(id, ids),
                None => state.post_tags.remove(&id),
            };
            return Err(err);
        }
        Ok(post)
    }

    async fn delete(&self, id: PostId) -> DomainResult<()> {
        let mut state = self.lock();
        if state.posts.remove(&id.0).is_none() {
            return Err(DomainError::NotFound("post not found".into()));
        }
        state.post_categories.remove(&id.0);
        state.post_tags.remove(&id.0);
        state.views.retain(|view| view.post_id != id);
        for stored in state.media.values_mut() {
            if stored.post_id == Some(id.0) {
                stored.post_id = None;
            }
        }
        Ok(())
    }

    async fn increment_view_count(&self, id: PostId) -> DomainResult<()> {
        let mut state = self.lock();
        let post = state
            .posts
            .get_mut(&id.0)
            .ok_or_else(|| DomainError::NotFound("post not found".into()))?;
        post.view_count += 1;
        Ok(())
    }
}

#[async_trait]
impl PostReadRepository for MemoryStore {
    async fn exists(&self, id: PostId) -> DomainResult<bool> {
        Ok(self.lock().posts.contains_key(&id.0))
    }

    async fn find_by_id(&self, id: PostId) -> DomainResult<Option<PostDetails>> {
        let state = self.lock();
        Ok(state.posts.get(&id.0).map(|post| state.details(post)))
    }

    async fn find_by_slug(&self, slug: &Slug) -> DomainResult<Option<PostDetails>> {
        let state = self.lock();
        Ok(state
            .posts
            .values()
            .find(|post| &post.slug == slug)
            .map(|post| state.details(post)))
    }

    async fn list(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> DomainResult<(Vec<PostDetails>, u64)> {
        let state = self.lock();
        let needle = filter.search.as_ref().map(|s| s.to_lowercase());

        let mut matching: Vec<PostDetails> = state
            .posts
            .values()
            .filter(|post| match filter.publication {
                PublicationFilter::All => true,
                PublicationFilter::Published => post.published,
                PublicationFilter::Drafts => !post.published,
            })
            .map(|post| state.details(post))
            .filter(|d| {
                filter
                    .category
                    .as_ref()
                    .is_none_or(|slug| d.categories.iter().any(|c| &c.slug == slug))
            })
            .filter(|d| {
                filter
                    .tag
                    .as_ref()
                    .is_none_or(|slug| d.tags.iter().any(|t| &t.slug == slug))
            })
            .filter(|d| {
                needle.as_ref().is_none_or(|needle| {
                    let post = &d.post;
                    post.title.as_str().to_lowercase().contains(needle)
                        || post.content.as_str().to_lowercase().contains(needle)
                        || post
                            .excerpt
                            .as_ref()
                            .is_some_and(|e| e.to_lowercase().contains(needle))
                })
            })
            .collect();

        match filter.order {
            PostOrder::NewestPublished => matching.sort_by(|a, b| {
                (b.post.published_at, b.post.id).cmp(&(a.post.published_at, a.post.id))
            }),
            PostOrder::NewestCreated => matching
                .sort_by(|a, b| (b.post.created_at, b.post.id).cmp(&(a.post.created_at, a.post.id))),
        }

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok((items, total))
    }
}

#[async_trait]
impl PostLinkRepository for MemoryStore {
    async fn replace_links(&self, post_id: PostId, targets: &LinkTargets) -> DomainResult<()> {
        self.lock().write_links(post_id.0, targets)
    }

    async fn links_of(&self, post_id: PostId, kind: LinkKind) -> DomainResult<BTreeSet<i64>> {
        let mut state = self.lock();
        Ok(state
            .links_mut(kind)
            .get(&post_id.0)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn insert(&self, category: NewCategory) -> DomainResult<Category> {
        let mut state = self.lock();
        state.ensure_slug_free(SluggableKind::Category, &category.slug, None)?;
        let id = state.next_id();
        let created = Category {
            id: CategoryId(id),
            name: category.name,
            slug: category.slug,
            description: category.description,
            color: category.color,
            created_at: category.created_at,
            updated_at: category.created_at,
        };
        state.categories.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, update: CategoryUpdate) -> DomainResult<Category> {
        let mut state = self.lock();
        if let Some(slug) = &update.slug {
            state.ensure_slug_free(SluggableKind::Category, slug, Some(update.id.0))?;
        }
        let category = state
            .categories
            .get_mut(&update.id.0)
            .ok_or_else(|| DomainError::NotFound("category not found".into()))?;
        if let Some(name) = update.name {
            category.name = name;
        }
        if let Some(slug) = update.slug {
            category.slug = slug;
        }
        if update.description.is_some() {
            category.description = update.description;
        }
        if update.color.is_some() {
            category.color = update.color;
        }
        category.updated_at = update.updated_at;
        Ok(category.clone())
    }

    async fn delete(&self, id: CategoryId) -> DomainResult<()> {
        let mut state = self.lock();
        state
            .categories
            .remove(&id.0)
            .map(|_| ())
            .ok_or_else(|| DomainError::NotFound("category not found".into()))
    }

    async fn find_by_id(&self, id: CategoryId) -> DomainResult<Option<Category>> {
        Ok(self.lock().categories.get(&id.0).cloned())
    }

    async fn find_by_slug(&self, slug: &Slug) -> DomainResult<Option<Category>> {
        Ok(self
            .lock()
            .categories
            .values()
            .find(|c| &c.slug == slug)
            .cloned())
    }

    async fn list_with_post_counts(&self) -> DomainResult<Vec<CategoryWithCount>> {
        let state = self.lock();
        let mut rows: Vec<CategoryWithCount> = state
            .categories
            .values()
            .map(|category| CategoryWithCount {
                post_count: state.published_links(&state.post_categories, category.id.0),
                category: category.clone(),
            })
            .collect();
        rows.sort_by(|a, b| a.category.name.as_str().cmp(b.category.name.as_str()));
        Ok(rows)
    }

    async fn count_linked_posts(&self, id: CategoryId) -> DomainResult<u64> {
        let state = self.lock();
        Ok(state
            .post_categories
            .values()
            .filter(|ids| ids.contains(&id.0))
            .count() as u64)
    }
}

#[async_trait]
impl TagRepository for MemoryStore {
    async fn insert(&self, tag: NewTag) -> DomainResult<Tag> {
        let mut state = self.lock();
        state.ensure_slug_free(SluggableKind::Tag, &tag.slug, None)?;
        let id = state.next_id();
        let created = Tag {
            id: TagId(id),
            name: tag.name,
            slug: tag.slug,
            created_at: tag.created_at,
            updated_at: tag.created_at,
        };
        state.tags.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, update: TagUpdate) -> DomainResult<Tag> {
        let mut state = self.lock();
        state.ensure_slug_free(SluggableKind::Tag, &update.slug, Some(update.id.0))?;
        let tag = state
            .tags
            .get_mut(&update.id.0)
            .ok_or_else(|| DomainError::NotFound("tag not found".into()))?;
        tag.name = update.name;
        tag.slug = update.slug;
        tag.updated_at = update.updated_at;
        Ok(tag.clone())
    }

    async fn delete(&self, id: TagId) -> DomainResult<()> {
        self.lock()
            .tags
            .remove(&id.0)
            .map(|_| ())
            .ok_or_else(|| DomainError::NotFound("tag not found".into()))
    }

    async fn find_by_id(&self, id: TagId) -> DomainResult<Option<Tag>> {
        Ok(self.lock().tags.get(&id.0).cloned())
    }

    async fn find_by_slug(&self, slug: &Slug) -> DomainResult<Option<Tag>> {
        Ok(self.lock().tags.values().find(|t| &t.slug == slug).cloned())
    }

    async fn list_with_post_counts(&self) -> DomainResult<Vec<TagWithCount>> {
        let state = self.lock();
        let mut rows: Vec<TagWithCount> = state
            .tags
            .values()
            .map(|tag| TagWithCount {
                post_count: state.published_links(&state.post_tags, tag.id.0),
                tag: tag.clone(),
            })
            .collect();
        rows.sort_by(|a, b| a.tag.name.as_str().cmp(b.tag.name.as_str()));
        Ok(rows)
    }

    async fn count_linked_posts(&self, id: TagId) -> DomainResult<u64> {
        Ok(self
            .lock()
            .post_tags
            .values()
            .filter(|ids| ids.contains(&id.0))
            .count() as u64)
    }
}

fn status_matches(status: SubscriberStatus, subscriber: &Subscriber) -> bool {
    match status {
        SubscriberStatus::All => true,
        SubscriberStatus::Active => subscriber.is_active,
        SubscriberStatus::Inactive => !subscriber.is_active,
    }
}

#[async_trait]
impl NewsletterRepository for MemoryStore {
    async fn find_by_email(&self, email: &EmailAddress) -> DomainResult<Option<Subscriber>> {
        Ok(self
            .lock()
            .subscribers
            .values()
            .find(|s| &s.email == email)
            .cloned())
    }

    async fn insert(&self, email: EmailAddress, now: DateTime<Utc>) -> DomainResult<Subscriber> {
        let mut state = self.lock();
        if state.subscribers.values().any(|s| s.email == email) {
            return Err(DomainError::Conflict("email already subscribed".into()));
        }
        let id = state.next_id();
        let subscriber = Subscriber {
            id: SubscriberId(id),
            email,
            is_active: true,
            subscribed_at: now,
            unsubscribed_at: None,
        };
        state.subscribers.insert(id, subscriber.clone());
        Ok(subscriber)
    }

    async fn set_active(
        &self,
        id: SubscriberId,
        active: bool,
        now: DateTime<Utc>,
    ) -> DomainResult<Subscriber> {
        let mut state = self.lock();
        let subscriber = state
            .subscribers
            .get_mut(&id.0)
            .ok_or_else(|| DomainError::NotFound("subscriber not found".into()))?;
        subscriber.is_active = active;
        subscriber.unsubscribed_at = if active { None } else { Some(now) };
        Ok(subscriber.clone())
    }

    async fn list(
        &self,
        status: SubscriberStatus,
        page: PageRequest,
    ) -> DomainResult<(Vec<Subscriber>, u64)> {
        let state = self.lock();
        let mut rows: Vec<Subscriber> = state
            .subscribers
            .values()
            .filter(|s| status_matches(status, s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.subscribed_at, b.id.0).cmp(&(a.subscribed_at, a.id.0)));
        let total = rows.len() as u64;
        let items = rows
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok((items, total))
    }

    async fn delete(&self, id: SubscriberId) -> DomainResult<bool> {
        Ok(self.lock().subscribers.remove(&id.0).is_some())
    }

    async fn apply_bulk(
        &self,
        action: BulkAction,
        ids: &[SubscriberId],
        now: DateTime<Utc>,
    ) -> DomainResult<u64> {
        let mut state = self.lock();
        let mut affected = 0;
        for id in ids {
            match action {
                BulkAction::Delete => {
                    if state.subscribers.remove(&id.0).is_some() {
                        affected += 1;
                    }
                }
                BulkAction::Activate | BulkAction::Deactivate => {
                    if let Some(subscriber) = state.subscribers.get_mut(&id.0) {
                        let active = action == BulkAction::Activate;
                        subscriber.is_active = active;
                        subscriber.unsubscribed_at = if active { None } else { Some(now) };
                        affected += 1;
                    }
                }
            }
        }
        Ok(affected)
    }

    async fn count(&self, status: SubscriberStatus) -> DomainResult<u64> {
        Ok(self
            .lock()
            .subscribers
            .values()
            .filter(|s| status_matches(status, s))
            .count() as u64)
    }

    async fn count_subscribed_since(&self, since: DateTime<Utc>) -> DomainResult<u64> {
        Ok(self
            .lock()
            .subscribers
            .values()
            .filter(|s| s.subscribed_at >= since)
            .count() as u64)
    }

    async fn monthly_counts_since(&self, since: DateTime<Utc>) -> DomainResult<Vec<MonthlyCount>> {
        let state = self.lock();
        let mut months: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for subscriber in state.subscribers.values().filter(|s| s.subscribed_at >= since) {
            let day = subscriber.subscribed_at.date_naive();
            if let Some(month) = NaiveDate::from_ymd_opt(day.year(), day.month(), 1) {
                *months.entry(month).or_default() += 1;
            }
        }
        Ok(months
            .into_iter()
            .rev()
            .map(|(month, subscriptions)| MonthlyCount {
                month,
                subscriptions,
            })
            .collect())
    }
}

#[async_trait]
impl AnalyticsRepository for MemoryStore {
    async fn record_view(&self, view: NewPostView) -> DomainResult<()> {
        let mut state = self.lock();
        if !state.posts.contains_key(&view.post_id.0) {
            return Err(DomainError::NotFound("post not found".into()));
        }
        state.views.push(view);
        Ok(())
    }

    async fn overview(&self, recent_since: DateTime<Utc>) -> DomainResult<DashboardOverview> {
        let state = self.lock();
        let total_posts = state.posts.len() as u64;
        let published_posts = state.posts.values().filter(|p| p.published).count() as u64;
        Ok(DashboardOverview {
            total_posts,
            published_posts,
            draft_posts: total_posts - published_posts,
            total_views: state.posts.values().map(|p| p.view_count.max(0) as u64).sum(),
            total_categories: state.categories.len() as u64,
            total_tags: state.tags.len() as u64,
            recent_views: state
                .views
                .iter()
                .filter(|v| v.viewed_at >= recent_since)
                .count() as u64,
        })
    }

    async fn popular_posts(&self, limit: u32) -> DomainResult<Vec<PostViewSummary>> {
        let state = self.lock();
        let mut posts: Vec<&Post> = state.posts.values().filter(|p| p.published).collect();
        posts.sort_by(|a, b| (b.view_count, b.id).cmp(&(a.view_count, a.id)));
        Ok(posts
            .into_iter()
            .take(limit as usize)
            .map(State::summary)
            .collect())
    }

    async fn recent_popular_posts(
        &self,
        since: DateTime<Utc>,
        limit: u32,
    ) -> DomainResult<Vec<PostViewSummary>> {
        let state = self.lock();
        let mut posts: Vec<&Post> = state
            .posts
            .values()
            .filter(|p| p.published && p.published_at.is_some_and(|at| at >= since))
            .collect();
        posts.sort_by(|a, b| (b.view_count, b.id).cmp(&(a.view_count, a.id)));
        Ok(posts
            .into_iter()
            .take(limit as usize)
            .map(State::summary)
            .collect())
    }

    async fn post_summary(&self, id: PostId) -> DomainResult<Option<PostViewSummary>> {
        Ok(self.lock().posts.get(&id.0).map(State::summary))
    }

    async fn recent_views(
        &self,
        id: PostId,
        since: DateTime<Utc>,
        limit: u32,
    ) -> DomainResult<Vec<RecordedView>> {
        let state = self.lock();
        let mut views: Vec<&NewPostView> = state
            .views
            .iter()
            .filter(|v| v.post_id == id && v.viewed_at >= since)
            .collect();
        views.sort_by(|a, b| b.viewed_at.cmp(&a.viewed_at));
        Ok(views
            .into_iter()
            .take(limit as usize)
            .map(|v| RecordedView {
                referrer: v.referrer.clone(),
                user_agent: v.user_agent.clone(),
                viewed_at: v.viewed_at,
            })
            .collect())
    }

    async fn daily_views(
        &self,
        id: Option<PostId>,
        since: DateTime<Utc>,
    ) -> DomainResult<Vec<DailyViews>> {
        let state = self.lock();
        let mut days: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for view in state
            .views
            .iter()
            .filter(|v| v.viewed_at >= since && id.is_none_or(|id| v.post_id == id))
        {
            *days.entry(view.viewed_at.date_naive()).or_default() += 1;
        }
        Ok(days
            .into_iter()
            .map(|(date, views)| DailyViews { date, views })
            .collect())
    }
}

#[async_trait]
impl MediaRepository for MemoryStore {
    async fn list(&self, page: PageRequest) -> DomainResult<(Vec<Media>, u64)> {
        let state = self.lock();
        let mut all: Vec<Media> = state
            .media
            .values()
            .map(|stored| state.resolve_media(stored))
            .collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok((items, total))
    }

    async fn find_by_id(&self, id: MediaId) -> DomainResult<Option<Media>> {
        let state = self.lock();
        Ok(state.media.get(&id.0).map(|stored| state.resolve_media(stored)))
    }

    async fn update(&self, id: MediaId, update: MediaUpdate) -> DomainResult<Media> {
        let mut state = self.lock();
        if let Some(Some(post_id)) = update.post_id {
            if !state.posts.contains_key(&post_id.0) {
                return Err(DomainError::InvalidReference("unknown post id".into()));
            }
        }
        let stored = state
            .media
            .get_mut(&id.0)
            .ok_or_else(|| DomainError::NotFound("media not found".into()))?;
        if let Some(alt_text) = update.alt_text {
            stored.media.alt_text = alt_text;
        }
        if let Some(caption) = update.caption {
            stored.media.caption = caption;
        }
        if let Some(post_id) = update.post_id {
            stored.post_id = post_id.map(|id| id.0);
        }
        let stored = stored.clone();
        Ok(state.resolve_media(&stored))
    }

    async fn delete(&self, id: MediaId) -> DomainResult<Option<Media>> {
        let mut state = self.lock();
        let removed = state.media.remove(&id.0);
        Ok(removed.map(|stored| state.resolve_media(&stored)))
    }
}
