use super::PostCommandService;
use crate::{
    application::{
        dto::AuthenticatedUser,
        error::{ApplicationError, ApplicationResult},
    },
    domain::post::PostId,
};

pub struct DeletePostCommand {
    pub id: i64,
}

impl PostCommandService {
    pub async fn delete_post(
        &self,
        actor: &AuthenticatedUser,
        command: DeletePostCommand,
    ) -> ApplicationResult<()> {
        actor.require("posts", "write")?;

        let id = PostId::new(command.id)?;
        if !self.read_repo.exists(id).await? {
            return Err(ApplicationError::not_found("post not found"));
        }

        self.write_repo.delete(id).await?;
        tracing::info!(post_id = id.0, "post deleted");
        Ok(())
    }
}
