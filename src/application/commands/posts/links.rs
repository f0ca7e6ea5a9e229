use super::PostCommandService;
use crate::{
    application::{
        dto::{AuthenticatedUser, PostLinksDto},
        error::ApplicationResult,
    },
    domain::post::{LinkKind, LinkTargets, PostId},
};

pub struct ReplacePostLinksCommand {
    pub post_id: i64,
    pub kind: LinkKind,
    pub target_ids: Vec<i64>,
}

impl PostCommandService {
    /// Replaces one link kind of a post with exactly the given targets.
    pub async fn replace_links(
        &self,
        actor: &AuthenticatedUser,
        command: ReplacePostLinksCommand,
    ) -> ApplicationResult<PostLinksDto> {
        actor.require("posts", "write")?;

        let post_id = PostId::new(command.post_id)?;
        let targets = LinkTargets::from_raw(command.kind, &command.target_ids)?;

        self.link_replacer.replace(post_id, &targets).await?;
        tracing::info!(
            post_id = post_id.0,
            kind = command.kind.as_str(),
            count = targets.raw_ids().len(),
            "post links replaced"
        );

        let current = self.link_replacer.current(post_id, command.kind).await?;
        Ok(PostLinksDto::new(post_id.into(), command.kind, current))
    }
}
