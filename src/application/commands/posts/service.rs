use std::sync::Arc;

use crate::{
    application::{
        dto::PostDto,
        error::{ApplicationError, ApplicationResult},
        ports::time::Clock,
    },
    domain::{
        post::{PostId, PostLinkReplacer, PostReadRepository, PostWriteRepository},
        slug::SlugAllocator,
    },
};

pub struct PostCommandService {
    pub(super) write_repo: Arc<dyn PostWriteRepository>,
    pub(super) read_repo: Arc<dyn PostReadRepository>,
    pub(super) slugs: Arc<SlugAllocator>,
    pub(super) link_replacer: Arc<PostLinkReplacer>,
    pub(super) clock: Arc<dyn Clock>,
}

impl PostCommandService {
    pub fn new(
        write_repo: Arc<dyn PostWriteRepository>,
        read_repo: Arc<dyn PostReadRepository>,
        slugs: Arc<SlugAllocator>,
        link_replacer: Arc<PostLinkReplacer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            write_repo,
            read_repo,
            slugs,
            link_replacer,
            clock,
        }
    }

    pub(super) async fn load(&self, id: PostId) -> ApplicationResult<PostDto> {
        self.read_repo
            .find_by_id(id)
            .await?
            .map(PostDto::from)
            .ok_or_else(|| ApplicationError::not_found("post not found"))
    }
}
