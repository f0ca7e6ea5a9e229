// src/application/queries/taxonomy.rs
use std::sync::Arc;

use super::{page_request, posts::DEFAULT_POST_PAGE_SIZE};
use crate::{
    application::{
        dto::{
            CategoryDetailDto, CategoryWithCountDto, PaginatedResult, PostDto, TagDetailDto,
            TagWithCountDto,
        },
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        category::CategoryRepository,
        pagination::PageRequest,
        post::{PostFilter, PostReadRepository},
        slug::Slug,
        tag::TagRepository,
    },
};

pub struct TaxonomyQueryService {
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
    posts: Arc<dyn PostReadRepository>,
}

impl TaxonomyQueryService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        tags: Arc<dyn TagRepository>,
        posts: Arc<dyn PostReadRepository>,
    ) -> Self {
        Self {
            categories,
            tags,
            posts,
        }
    }

    pub async fn list_categories(&self) -> ApplicationResult<Vec<CategoryWithCountDto>> {
        let rows = self.categories.list_with_post_counts().await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn list_tags(&self) -> ApplicationResult<Vec<TagWithCountDto>> {
        let rows = self.tags.list_with_post_counts().await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get_category(
        &self,
        slug: &str,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> ApplicationResult<CategoryDetailDto> {
        let not_found = || ApplicationError::not_found("category not found");
        let slug = Slug::new(slug).map_err(|_| not_found())?;
        let category = self
            .categories
            .find_by_slug(&slug)
            .await?
            .ok_or_else(not_found)?;

        let page = page_request(page, limit, DEFAULT_POST_PAGE_SIZE)?;
        let filter = PostFilter {
            category: Some(category.slug.clone()),
            ..PostFilter::public()
        };
        Ok(CategoryDetailDto {
            category: category.into(),
            posts: self.published_page(&filter, page).await?,
        })
    }

    pub async fn get_tag(
        &self,
        slug: &str,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> ApplicationResult<TagDetailDto> {
        let not_found = || ApplicationError::not_found("tag not found");
        let slug = Slug::new(slug).map_err(|_| not_found())?;
        let tag = self.tags.find_by_slug(&slug).await?.ok_or_else(not_found)?;

        let page = page_request(page, limit, DEFAULT_POST_PAGE_SIZE)?;
        let filter = PostFilter {
            tag: Some(tag.slug.clone()),
            ..PostFilter::public()
        };
        Ok(TagDetailDto {
            tag: tag.into(),
            posts: self.published_page(&filter, page).await?,
        })
    }

    async fn published_page(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> ApplicationResult<PaginatedResult<PostDto>> {
        let (items, total) = self.posts.list(filter, page).await?;
        Ok(PaginatedResult::new(items, total, page).map(PostDto::from))
    }
}
