use crate::domain::user::{Capability, Role, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{auth::AuthenticatedUser, serde_time};

/// Administrator account without its password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i64,
    #[schema(example = "owner@example.com")]
    pub email: String,
    #[schema(example = "Site Owner")]
    pub name: String,
    #[schema(value_type = String, example = "admin")]
    pub role: Role,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id.into(),
            email: user.email.to_string(),
            name: user.name.into(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// One `resource:action` right carried by the token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CapabilityView {
    #[schema(example = "posts")]
    pub resource: String,
    #[schema(example = "write")]
    pub action: String,
}

impl From<Capability> for CapabilityView {
    fn from(value: Capability) -> Self {
        Self {
            resource: value.resource,
            action: value.action,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfileDto {
    pub user: UserDto,
    pub capabilities: Vec<CapabilityView>,
    #[serde(with = "serde_time")]
    pub issued_at: DateTime<Utc>,
    #[serde(with = "serde_time")]
    pub expires_at: DateTime<Utc>,
}

impl UserProfileDto {
    /// Capabilities come from the token, sorted for stable output.
    pub fn from_parts(user: User, auth: &AuthenticatedUser) -> Self {
        let mut capabilities: Vec<CapabilityView> =
            auth.capabilities.iter().cloned().map(Into::into).collect();
        capabilities.sort_by(|a, b| (&a.resource, &a.action).cmp(&(&b.resource, &b.action)));

        Self {
            user: user.into(),
            capabilities,
            issued_at: auth.issued_at,
            expires_at: auth.expires_at,
        }
    }
}
