use crate::domain::errors::DomainResult;
use crate::domain::pagination::PageRequest;
use crate::domain::post::entity::{NewPost, Post, PostDetails, PostFilter, PostUpdate};
use crate::domain::post::value_objects::PostId;
use crate::domain::slug::Slug;
use async_trait::async_trait;

#[async_trait]
pub trait PostWriteRepository: Send + Sync {
    /// Inserts the post and both link sets in one transaction.
    async fn insert(&self, post: NewPost) -> DomainResult<Post>;
    /// Applies field changes and any supplied link sets in one transaction.
    async fn update(&self, update: PostUpdate) -> DomainResult<Post>;
    async fn delete(&self, id: PostId) -> DomainResult<()>;
    async fn increment_view_count(&self, id: PostId) -> DomainResult<()>;
}

#[async_trait]
pub trait PostReadRepository: Send + Sync {
    async fn exists(&self, id: PostId) -> DomainResult<bool>;
    async fn find_by_id(&self, id: PostId) -> DomainResult<Option<PostDetails>>;
    async fn find_by_slug(&self, slug: &Slug) -> DomainResult<Option<PostDetails>>;
    /// Returns one page and the total number of matching posts.
    async fn list(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> DomainResult<(Vec<PostDetails>, u64)>;
}
