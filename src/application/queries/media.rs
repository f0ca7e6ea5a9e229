// src/application/queries/media.rs
use std::sync::Arc;

use super::page_request;
use crate::{
    application::{
        dto::{AuthenticatedUser, MediaDto, PaginatedResult},
        error::{ApplicationError, ApplicationResult},
    },
    domain::media::{MediaId, MediaRepository},
};

pub const DEFAULT_MEDIA_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, Default)]
pub struct ListMediaQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

pub struct MediaQueryService {
    repo: Arc<dyn MediaRepository>,
}

impl MediaQueryService {
    pub fn new(repo: Arc<dyn MediaRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_media(
        &self,
        actor: &AuthenticatedUser,
        query: ListMediaQuery,
    ) -> ApplicationResult<PaginatedResult<MediaDto>> {
        actor.require("media", "manage")?;

        let page = page_request(query.page, query.limit, DEFAULT_MEDIA_PAGE_SIZE)?;
        let (items, total) = self.repo.list(page).await?;
        Ok(PaginatedResult::new(items, total, page).map(MediaDto::from))
    }

    pub async fn get_media(&self, actor: &AuthenticatedUser, id: i64) -> ApplicationResult<MediaDto> {
        actor.require("media", "manage")?;

        let id = MediaId::new(id)?;
        self.repo
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| ApplicationError::not_found("media not found"))
    }
}
