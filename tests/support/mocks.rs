// tests/support/mocks.rs
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use once_cell::sync::Lazy;
use starlite_blog::application::{
    ApplicationResult,
    dto::{AuthTokenDto, AuthenticatedUser, TokenSubject},
    error::ApplicationError,
    ports::{
        security::{PasswordHasher, TokenManager},
        storage::MediaFiles,
        time::Clock,
    },
};
use starlite_blog::domain::user::{Role, UserId};
use std::sync::Mutex;

pub static FIXED_NOW: Lazy<DateTime<Utc>> =
    Lazy::new(|| Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap());

pub const ADMIN_TOKEN: &str = "admin|1|admin@example.com";
pub const AUTHOR_TOKEN: &str = "author|2|author@example.com";

/// Stores passwords behind a visible prefix so tests can reason about them.
pub struct PlainPasswordHasher;

#[async_trait]
impl PasswordHasher for PlainPasswordHasher {
    async fn hash(&self, password: &str) -> ApplicationResult<String> {
        Ok(format!("plain${password}"))
    }

    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<()> {
        if expected_hash == format!("plain${password}") {
            Ok(())
        } else {
            Err(ApplicationError::unauthorized("invalid credentials"))
        }
    }
}

/// Tokens are `role|id|email`; anything else is rejected.
pub struct StaticTokenManager;

#[async_trait]
impl TokenManager for StaticTokenManager {
    async fn issue(&self, subject: TokenSubject) -> ApplicationResult<AuthTokenDto> {
        Ok(AuthTokenDto {
            token: format!(
                "{}|{}|{}",
                subject.role.as_str(),
                subject.user_id.0,
                subject.email
            ),
            issued_at: *FIXED_NOW,
            expires_at: *FIXED_NOW + Duration::hours(1),
            expires_in: 3600,
        })
    }

    async fn authenticate(&self, token: &str) -> ApplicationResult<AuthenticatedUser> {
        let invalid = || ApplicationError::unauthorized("invalid token");
        let mut parts = token.splitn(3, '|');
        let role: Role = parts
            .next()
            .and_then(|r| r.parse().ok())
            .ok_or_else(invalid)?;
        let id = parts
            .next()
            .and_then(|id| id.parse::<i64>().ok())
            .ok_or_else(invalid)?;
        let email = parts.next().ok_or_else(invalid)?;

        Ok(principal(role, id, email))
    }
}

pub fn principal(role: Role, id: i64, email: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        id: UserId(id),
        email: email.to_string(),
        role,
        capabilities: role.default_capabilities(),
        issued_at: *FIXED_NOW,
        expires_at: *FIXED_NOW + Duration::hours(1),
    }
}

pub fn admin() -> AuthenticatedUser {
    principal(Role::Admin, 1, "admin@example.com")
}

pub fn author() -> AuthenticatedUser {
    principal(Role::Author, 2, "author@example.com")
}

/// Starts at `FIXED_NOW` and only moves when told to.
pub struct TestClock {
    now: Mutex<DateTime<Utc>>,
}

impl Default for TestClock {
    fn default() -> Self {
        Self {
            now: Mutex::new(*FIXED_NOW),
        }
    }
}

impl TestClock {
    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Remembers removed filenames; names listed in `fail_on` error instead.
#[derive(Default)]
pub struct RecordingMediaFiles {
    removed: Mutex<Vec<String>>,
    fail_on: Mutex<Vec<String>>,
}

impl RecordingMediaFiles {
    pub fn removed(&self) -> Vec<String> {
        self.removed.lock().unwrap().clone()
    }

    pub fn fail_on(&self, filename: &str) {
        self.fail_on.lock().unwrap().push(filename.to_string());
    }
}

#[async_trait]
impl MediaFiles for RecordingMediaFiles {
    async fn remove(&self, filename: &str) -> ApplicationResult<()> {
        if self.fail_on.lock().unwrap().iter().any(|f| f == filename) {
            return Err(ApplicationError::infrastructure("disk unavailable"));
        }
        self.removed.lock().unwrap().push(filename.to_string());
        Ok(())
    }
}
