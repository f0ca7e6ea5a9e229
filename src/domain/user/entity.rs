// src/domain/user/entity.rs
use crate::domain::email::EmailAddress;
use crate::domain::user::value_objects::{Capability, DisplayName, PasswordHash, Role, UserId};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub name: DisplayName,
    pub password_hash: PasswordHash,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn capabilities(&self) -> HashSet<Capability> {
        self.role.default_capabilities()
    }

    pub fn set_password(&mut self, password_hash: PasswordHash) {
        self.password_hash = password_hash;
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: EmailAddress,
    pub name: DisplayName,
    pub password_hash: PasswordHash,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    pub fn new(
        email: EmailAddress,
        name: DisplayName,
        password_hash: PasswordHash,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            email,
            name,
            password_hash,
            role,
            created_at,
        }
    }
}
