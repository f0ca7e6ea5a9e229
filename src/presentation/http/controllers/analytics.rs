// src/presentation/http/controllers/analytics.rs
use crate::application::dto::{DashboardDto, PostAnalyticsDto, TrendsDto};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::{Authenticated, Visitor};
use crate::presentation::http::openapi::MessageResponse;
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    extract::{Path, Query},
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PostWindowParams {
    /// Days to look back, 30 when absent.
    pub days: Option<u32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrendParams {
    /// Days to look back, 7 when absent.
    pub period: Option<u32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TrackRequest {
    pub post_id: i64,
    /// Overrides the `Referer` header when the beacon runs client side.
    pub referrer: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/analytics/dashboard",
    responses(
        (status = 200, description = "Site totals and most read posts.", body = DashboardDto),
        (status = 403, description = "Missing capability.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Analytics"
)]
pub async fn dashboard(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
) -> HttpResult<Json<DashboardDto>> {
    state
        .services
        .analytics_queries
        .dashboard(&user)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/api/analytics/posts/{id}",
    params(("id" = i64, Path, description = "Post id"), PostWindowParams),
    responses(
        (status = 200, description = "Views of one post.", body = PostAnalyticsDto),
        (status = 400, description = "Window outside 1..=365 days.", body = crate::presentation::http::error::ErrorResponse),
        (status = 404, description = "Post not found.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Analytics"
)]
pub async fn post_analytics(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<i64>,
    Query(params): Query<PostWindowParams>,
) -> HttpResult<Json<PostAnalyticsDto>> {
    state
        .services
        .analytics_queries
        .post_analytics(&user, id, params.days)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/api/analytics/trends",
    params(TrendParams),
    responses(
        (status = 200, description = "Daily views and top taxonomy.", body = TrendsDto),
        (status = 400, description = "Period outside 1..=365 days.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Analytics"
)]
pub async fn trends(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Query(params): Query<TrendParams>,
) -> HttpResult<Json<TrendsDto>> {
    state
        .services
        .analytics_queries
        .trends(&user, params.period)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/api/analytics/track",
    request_body = TrackRequest,
    responses(
        (status = 200, description = "View recorded.", body = MessageResponse),
        (status = 404, description = "Unknown or unpublished post.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(()),
    tag = "Analytics"
)]
pub async fn track(
    Extension(state): Extension<HttpState>,
    Visitor(mut visitor): Visitor,
    Json(payload): Json<TrackRequest>,
) -> HttpResult<Json<MessageResponse>> {
    if payload.referrer.is_some() {
        visitor.referrer = payload.referrer;
    }

    state
        .services
        .analytics_commands
        .track(payload.post_id, visitor)
        .await
        .into_http()?;

    Ok(Json(MessageResponse::new("View tracked")))
}
