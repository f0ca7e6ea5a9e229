// src/infrastructure/security/claims.rs
use crate::application::{
    dto::AuthenticatedUser,
    error::{ApplicationError, ApplicationResult},
};
use crate::domain::user::{Capability, Role, UserId};
use biscuit_auth::builder::{Fact, Predicate, Term};
use chrono::{DateTime, Utc};
use std::{
    collections::HashSet,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

/// Rebuilds the principal from the facts of a verified token.
pub(super) fn parse_claims(facts: Vec<Fact>) -> ApplicationResult<AuthenticatedUser> {
    let mut claims = Claims::default();
    for fact in facts {
        claims.apply(&fact.predicate);
    }
    claims.into_user()
}

#[derive(Default)]
struct Claims {
    user_id: Option<i64>,
    email: Option<String>,
    role: Option<Role>,
    issued_at: Option<SystemTime>,
    expires_at: Option<SystemTime>,
    rights: HashSet<Capability>,
}

fn date(term: Option<&Term>) -> Option<SystemTime> {
    match term {
        Some(Term::Date(seconds)) => Some(UNIX_EPOCH + Duration::from_secs(*seconds)),
        _ => None,
    }
}

impl Claims {
    fn apply(&mut self, predicate: &Predicate) {
        let terms = predicate.terms.as_slice();
        match (predicate.name.as_str(), terms) {
            ("user", [Term::Integer(id), Term::Str(email)]) => {
                self.user_id = Some(*id);
                self.email = Some(email.clone());
            }
            ("role", [Term::Str(name)]) => self.role = name.parse().ok(),
            ("issued_at", _) => self.issued_at = date(terms.first()),
            ("expires_at", _) => self.expires_at = date(terms.first()),
            ("right", [Term::Str(resource), Term::Str(action)]) => {
                self.rights
                    .insert(Capability::new(resource.clone(), action.clone()));
            }
            _ => {}
        }
    }

    fn into_user(self) -> ApplicationResult<AuthenticatedUser> {
        let missing = |what: &str| ApplicationError::unauthorized(format!("token missing {what}"));

        let id = self.user_id.ok_or_else(|| missing("user"))?;
        let email = self.email.ok_or_else(|| missing("user"))?;
        let role = self.role.ok_or_else(|| missing("role"))?;
        let issued_at = self.issued_at.ok_or_else(|| missing("issued_at"))?;
        let expires_at = self.expires_at.ok_or_else(|| missing("expires_at"))?;

        let id = UserId::new(id).map_err(|_| ApplicationError::unauthorized("invalid user id"))?;

        // Rights embedded at issue time never widen beyond the role.
        let allowed = role.default_capabilities();
        let capabilities = self
            .rights
            .into_iter()
            .filter(|cap| allowed.contains(cap))
            .collect();

        Ok(AuthenticatedUser {
            id,
            email,
            role,
            capabilities,
            issued_at: DateTime::<Utc>::from(issued_at),
            expires_at: DateTime::<Utc>::from(expires_at),
        })
    }
}
