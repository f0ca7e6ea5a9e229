// src/domain/post/links.rs
use crate::domain::category::CategoryId;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::post::repository::PostReadRepository;
use crate::domain::post::value_objects::PostId;
use crate::domain::tag::TagId;
use async_trait::async_trait;
use std::{collections::BTreeSet, fmt, sync::Arc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Category,
    Tag,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::Category => "category",
            LinkKind::Tag => "tag",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete target set for one relation kind of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTargets {
    Categories(BTreeSet<CategoryId>),
    Tags(BTreeSet<TagId>),
}

impl LinkTargets {
    pub fn kind(&self) -> LinkKind {
        match self {
            LinkTargets::Categories(_) => LinkKind::Category,
            LinkTargets::Tags(_) => LinkKind::Tag,
        }
    }

    pub fn raw_ids(&self) -> BTreeSet<i64> {
        match self {
            LinkTargets::Categories(ids) => ids.iter().copied().map(i64::from).collect(),
            LinkTargets::Tags(ids) => ids.iter().copied().map(i64::from).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            LinkTargets::Categories(ids) => ids.is_empty(),
            LinkTargets::Tags(ids) => ids.is_empty(),
        }
    }

    /// Builds a target set from raw request ids, dropping duplicates.
    pub fn from_raw(kind: LinkKind, ids: &[i64]) -> DomainResult<Self> {
        Ok(match kind {
            LinkKind::Category => LinkTargets::Categories(
                ids.iter()
                    .map(|id| CategoryId::new(*id))
                    .collect::<DomainResult<_>>()?,
            ),
            LinkKind::Tag => LinkTargets::Tags(
                ids.iter()
                    .map(|id| TagId::new(*id))
                    .collect::<DomainResult<_>>()?,
            ),
        })
    }
}

#[async_trait]
pub trait PostLinkRepository: Send + Sync {
    /// Replaces every row of `targets.kind()` for the post inside one
    /// transaction. Unknown target ids fail with `InvalidReference`.
    async fn replace_links(&self, post_id: PostId, targets: &LinkTargets) -> DomainResult<()>;
    async fn links_of(&self, post_id: PostId, kind: LinkKind) -> DomainResult<BTreeSet<i64>>;
}

/// Replaces the category or tag set of an existing post.
pub struct PostLinkReplacer {
    posts: Arc<dyn PostReadRepository>,
    links: Arc<dyn PostLinkRepository>,
}

impl PostLinkReplacer {
    pub fn new(posts: Arc<dyn PostReadRepository>, links: Arc<dyn PostLinkRepository>) -> Self {
        Self { posts, links }
    }

    pub async fn replace(&self, post_id: PostId, targets: &LinkTargets) -> DomainResult<()> {
        if !self.posts.exists(post_id).await? {
            return Err(DomainError::NotFound("post not found".into()));
        }
        self.links.replace_links(post_id, targets).await
    }

    pub async fn current(&self, post_id: PostId, kind: LinkKind) -> DomainResult<BTreeSet<i64>> {
        self.links.links_of(post_id, kind).await
    }
}
