use super::UserCommandService;
use crate::{
    application::{
        dto::{LoginResultDto, TokenSubject},
        error::{ApplicationError, ApplicationResult},
    },
    domain::{email::EmailAddress, user::User},
};

pub struct LoginUserCommand {
    pub email: String,
    pub password: String,
}

impl UserCommandService {
    pub async fn login(&self, command: LoginUserCommand) -> ApplicationResult<LoginResultDto> {
        // A malformed address cannot belong to an account.
        let email = EmailAddress::new(command.email)
            .map_err(|_| ApplicationError::unauthorized("invalid credentials"))?;
        let user = self.find_and_authenticate_user(&email, &command.password).await?;

        let subject = TokenSubject {
            user_id: user.id,
            email: user.email.to_string(),
            role: user.role,
            capabilities: user.capabilities(),
        };
        let token = self.token_manager.issue(subject).await?;
        tracing::info!(user_id = user.id.0, "user logged in");

        Ok(LoginResultDto {
            user: user.into(),
            token,
        })
    }

    async fn find_and_authenticate_user(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> ApplicationResult<User> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| ApplicationError::unauthorized("invalid credentials"))?;

        self.password_hasher
            .verify(password, user.password_hash.as_str())
            .await?;

        Ok(user)
    }
}
