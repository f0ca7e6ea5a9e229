use std::sync::Arc;

use crate::{
    application::{
        dto::{AuthenticatedUser, UserProfileDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::user::UserRepository,
};

pub struct UserQueryService {
    user_repo: Arc<dyn UserRepository>,
}

impl UserQueryService {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Profile of the token holder. A token outliving its account reads as 404.
    pub async fn get_profile(&self, actor: &AuthenticatedUser) -> ApplicationResult<UserProfileDto> {
        let user = self
            .user_repo
            .find_by_id(actor.id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("user not found"))?;

        Ok(UserProfileDto::from_parts(user, actor))
    }
}
