use super::UserCommandService;
use crate::{
    application::{
        dto::AuthenticatedUser,
        error::{ApplicationError, ApplicationResult},
    },
    domain::user::{PasswordHash, ensure_password_policy},
};

pub struct ChangePasswordCommand {
    pub current_password: String,
    pub new_password: String,
}

impl UserCommandService {
    pub async fn change_password(
        &self,
        actor: &AuthenticatedUser,
        command: ChangePasswordCommand,
    ) -> ApplicationResult<()> {
        let user = self.account_of(actor).await?;

        self.password_hasher
            .verify(&command.current_password, user.password_hash.as_str())
            .await
            .map_err(|err| match err {
                ApplicationError::Unauthorized(_) => {
                    ApplicationError::validation("current password is incorrect")
                }
                other => other,
            })?;

        ensure_password_policy(&command.new_password)?;
        let hashed = self.password_hasher.hash(&command.new_password).await?;
        self.user_repo
            .update_password(user.id, PasswordHash::new(hashed)?)
            .await?;
        tracing::info!(user_id = user.id.0, "password changed");

        Ok(())
    }
}
