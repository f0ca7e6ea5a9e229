// src/infrastructure/repositories/error.rs
use crate::domain::errors::DomainError;

const CNT_POST_SLUG: &str = "posts_slug_key";
const CNT_CATEGORY_SLUG: &str = "categories_slug_key";
const CNT_TAG_SLUG: &str = "tags_slug_key";
const CNT_USER_EMAIL: &str = "users_email_key";
const CNT_SUBSCRIBER_EMAIL: &str = "newsletter_subscribers_email_key";
const CNT_POST_AUTHOR: &str = "posts_author_id_fkey";
const CNT_POST_PUBLISHED_CHECK: &str = "posts_published_requires_timestamp_chk";
const CNT_POST_CATEGORY_POST: &str = "post_categories_post_id_fkey";
const CNT_POST_CATEGORY_TARGET: &str = "post_categories_category_id_fkey";
const CNT_POST_TAG_POST: &str = "post_tags_post_id_fkey";
const CNT_POST_TAG_TARGET: &str = "post_tags_tag_id_fkey";
const CNT_POST_VIEW_POST: &str = "post_views_post_id_fkey";
const CNT_POST_CATEGORY_PAIR: &str = "post_categories_pkey";
const CNT_POST_TAG_PAIR: &str = "post_tags_pkey";
const CNT_MEDIA_POST: &str = "media_post_id_fkey";

fn from_constraint(constraint: &str) -> Option<DomainError> {
    let err = match constraint {
        CNT_POST_SLUG => DomainError::Conflict("post slug already exists".into()),
        CNT_CATEGORY_SLUG => DomainError::Conflict("category slug already exists".into()),
        CNT_TAG_SLUG => DomainError::Conflict("tag slug already exists".into()),
        CNT_USER_EMAIL => DomainError::Conflict("user already exists".into()),
        CNT_SUBSCRIBER_EMAIL => DomainError::Conflict("email already subscribed".into()),
        CNT_POST_CATEGORY_PAIR => DomainError::Conflict("post already linked to category".into()),
        CNT_POST_TAG_PAIR => DomainError::Conflict("post already linked to tag".into()),
        CNT_POST_AUTHOR => DomainError::InvalidReference("author does not exist".into()),
        CNT_POST_CATEGORY_TARGET => DomainError::InvalidReference("unknown category id".into()),
        CNT_POST_TAG_TARGET => DomainError::InvalidReference("unknown tag id".into()),
        CNT_MEDIA_POST => DomainError::InvalidReference("unknown post id".into()),
        CNT_POST_CATEGORY_POST | CNT_POST_TAG_POST | CNT_POST_VIEW_POST => {
            DomainError::NotFound("post not found".into())
        }
        CNT_POST_PUBLISHED_CHECK => {
            DomainError::Validation("published posts require published_at".into())
        }
        _ => return None,
    };
    Some(err)
}

/// Translates driver errors into domain errors. Known constraints map to
/// precise messages; every other integrity violation falls back on its
/// SQLSTATE class.
pub fn map_sqlx(err: sqlx::Error) -> DomainError {
    let sqlx::Error::Database(db_err) = &err else {
        return DomainError::Persistence(err.to_string());
    };

    if let Some(mapped) = db_err.constraint().and_then(from_constraint) {
        return mapped;
    }

    let subject = db_err.constraint().unwrap_or("anonymous constraint");
    match db_err.code().as_deref() {
        Some("23505") => DomainError::Conflict(format!("unique constraint violated: {subject}")),
        Some("23503") => {
            DomainError::InvalidReference(format!("referenced record not found: {subject}"))
        }
        Some("23514") => DomainError::Validation(format!("check constraint violated: {subject}")),
        _ => DomainError::Persistence(db_err.message().to_string()),
    }
}

/// Escapes `LIKE` wildcards and wraps the term for a substring match.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub(crate) fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}
