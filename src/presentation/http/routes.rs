// src/presentation/http/routes.rs
use crate::presentation::http::controllers::{
    analytics, auth, categories, media, newsletter, posts, system, tags,
};
use crate::presentation::http::{middleware::rate_limit, openapi, state::HttpState};
use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
    routing::{get, post, put},
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Router without rate limiting, for callers that do not provide peer
/// addresses.
pub fn build_router(state: HttpState, allowed_origins: &[String]) -> Router {
    build_router_with_rate_limiter(state, allowed_origins, false)
}

pub fn build_router_with_rate_limiter(
    state: HttpState,
    allowed_origins: &[String],
    rate_limited: bool,
) -> Router {
    let mut public_writes = Router::new()
        .route("/api/newsletter/subscribe", post(newsletter::subscribe))
        .route("/api/newsletter/unsubscribe", post(newsletter::unsubscribe))
        .route("/api/analytics/track", post(analytics::track));

    if rate_limited {
        match rate_limit::public_write_limiter() {
            Some(limiter) => public_writes = public_writes.layer(limiter),
            None => tracing::warn!("rate limiter configuration rejected; serving without limits"),
        }
    }

    Router::new()
        .merge(openapi::docs_router())
        .route("/health", get(system::health))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/register-admin", post(auth::register_admin))
        .route("/api/auth/change-password", put(auth::change_password))
        .route(
            "/api/posts",
            get(posts::list_posts).post(posts::create_post),
        )
        .route("/api/posts/admin/all", get(posts::list_all_posts))
        .route(
            "/api/posts/{post}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/api/posts/{post}/categories", put(posts::replace_categories))
        .route("/api/posts/{post}/tags", put(posts::replace_tags))
        .route(
            "/api/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/api/categories/{category}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/api/tags", get(tags::list_tags).post(tags::create_tag))
        .route(
            "/api/tags/{tag}",
            get(tags::get_tag)
                .put(tags::update_tag)
                .delete(tags::delete_tag),
        )
        .route(
            "/api/newsletter/subscribers",
            get(newsletter::list_subscribers),
        )
        .route(
            "/api/newsletter/subscribers/{id}",
            axum::routing::delete(newsletter::delete_subscriber),
        )
        .route("/api/newsletter/stats", get(newsletter::stats))
        .route("/api/newsletter/bulk-action", post(newsletter::bulk_action))
        .route("/api/analytics/dashboard", get(analytics::dashboard))
        .route("/api/analytics/posts/{id}", get(analytics::post_analytics))
        .route("/api/analytics/trends", get(analytics::trends))
        .route("/api/media", get(media::list_media))
        .route(
            "/api/media/{id}",
            get(media::get_media)
                .put(media::update_media)
                .delete(media::delete_media),
        )
        .merge(public_writes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .layer(Extension(state))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}
