// src/infrastructure/security/password.rs
use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::security::PasswordHasher,
};
use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use async_trait::async_trait;

/// Argon2id with the crate defaults. Stored values are PHC strings, so the
/// parameters travel with every hash.
#[derive(Default, Clone)]
pub struct Argon2PasswordHasher;

/// Argon2 is deliberately slow; keep it off the async workers.
async fn off_runtime<T, F>(work: F) -> ApplicationResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> ApplicationResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| ApplicationError::infrastructure(format!("password task failed: {err}")))?
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> ApplicationResult<String> {
        let password = password.to_owned();
        off_runtime(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|err| ApplicationError::infrastructure(err.to_string()))
        })
        .await
    }

    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<()> {
        let password = password.to_owned();
        let stored = expected_hash.to_owned();
        off_runtime(move || {
            // A corrupt stored hash is a server fault, not a bad login.
            let parsed = PasswordHash::new(&stored).map_err(|err| {
                ApplicationError::infrastructure(format!("stored password hash unreadable: {err}"))
            })?;
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .map_err(|_| ApplicationError::unauthorized("invalid credentials"))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_verifies_only_the_original_password() {
        let hasher = Argon2PasswordHasher;
        let hash = hasher.hash("correct horse").await.unwrap();

        assert!(hash.starts_with("$argon2"));
        hasher.verify("correct horse", &hash).await.unwrap();
        let err = hasher.verify("battery staple", &hash).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn salts_differ_between_hashes() {
        let hasher = Argon2PasswordHasher;
        let first = hasher.hash("same input").await.unwrap();
        let second = hasher.hash("same input").await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn unreadable_stored_hash_is_an_infrastructure_error() {
        let err = Argon2PasswordHasher
            .verify("anything", "not-a-phc-string")
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Infrastructure(_)));
    }
}
