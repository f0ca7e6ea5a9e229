use super::UserCommandService;
use crate::{
    application::{
        dto::{AuthenticatedUser, UserDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        email::EmailAddress,
        user::{DisplayName, NewUser, PasswordHash, Role, ensure_password_policy},
    },
};

pub struct RegisterAdminCommand {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl UserCommandService {
    /// The first account may be created anonymously; later ones need an
    /// administrator.
    pub async fn register_admin(
        &self,
        actor: Option<&AuthenticatedUser>,
        command: RegisterAdminCommand,
    ) -> ApplicationResult<UserDto> {
        let existing = self.user_repo.count().await?;
        if existing > 0 {
            let requester = actor
                .ok_or_else(|| ApplicationError::unauthorized("authentication required"))?;
            requester.require("users", "create")?;
        }

        let email = EmailAddress::new(command.email)?;
        let name = DisplayName::new(command.name)?;
        ensure_password_policy(&command.password)?;

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(ApplicationError::conflict("user already exists"));
        }

        let hashed = self.password_hasher.hash(&command.password).await?;
        let new_user = NewUser::new(
            email,
            name,
            PasswordHash::new(hashed)?,
            Role::Admin,
            self.clock.now(),
        );
        let user = self.user_repo.insert(new_user).await?;
        tracing::info!(user_id = user.id.0, "admin account registered");

        Ok(user.into())
    }
}
