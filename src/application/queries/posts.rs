// src/application/queries/posts.rs
use std::sync::Arc;

use super::page_request;
use crate::{
    application::{
        dto::{AuthenticatedUser, PaginatedResult, PostDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        post::{PostDetails, PostFilter, PostReadRepository, PublicationFilter},
        slug::Slug,
    },
};

pub const DEFAULT_POST_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Default)]
pub struct ListPostsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListAllPostsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// `published`, `draft`, or absent for every post.
    pub status: Option<String>,
}

pub struct PostQueryService {
    read_repo: Arc<dyn PostReadRepository>,
}

impl PostQueryService {
    pub fn new(read_repo: Arc<dyn PostReadRepository>) -> Self {
        Self { read_repo }
    }

    /// Published posts, newest publication first.
    pub async fn list_published(
        &self,
        query: ListPostsQuery,
    ) -> ApplicationResult<PaginatedResult<PostDto>> {
        let page = page_request(query.page, query.limit, DEFAULT_POST_PAGE_SIZE)?;
        let filter = PostFilter {
            category: query.category.map(Slug::new).transpose()?,
            tag: query.tag.map(Slug::new).transpose()?,
            search: query
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            ..PostFilter::public()
        };

        let (items, total) = self.read_repo.list(&filter, page).await?;
        Ok(PaginatedResult::new(items, total, page).map(PostDto::from))
    }

    /// Every post including drafts, newest first.
    pub async fn list_all(
        &self,
        actor: &AuthenticatedUser,
        query: ListAllPostsQuery,
    ) -> ApplicationResult<PaginatedResult<PostDto>> {
        actor.require("posts", "view_drafts")?;

        let page = page_request(query.page, query.limit, DEFAULT_POST_PAGE_SIZE)?;
        let publication = match query.status.as_deref() {
            None | Some("all") => PublicationFilter::All,
            Some("published") => PublicationFilter::Published,
            Some("draft") => PublicationFilter::Drafts,
            Some(other) => {
                return Err(ApplicationError::validation(format!(
                    "unknown status '{other}'"
                )));
            }
        };

        let (items, total) = self
            .read_repo
            .list(&PostFilter::admin(publication), page)
            .await?;
        Ok(PaginatedResult::new(items, total, page).map(PostDto::from))
    }

    /// Drafts are indistinguishable from missing posts.
    pub async fn get_published_by_slug(&self, slug: &str) -> ApplicationResult<PostDetails> {
        let not_found = || ApplicationError::not_found("post not found");
        let slug = Slug::new(slug).map_err(|_| not_found())?;
        self.read_repo
            .find_by_slug(&slug)
            .await?
            .filter(|details| details.post.is_visible_publicly())
            .ok_or_else(not_found)
    }
}
