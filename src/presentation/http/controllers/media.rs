// src/presentation/http/controllers/media.rs
use crate::application::{
    commands::media::UpdateMediaCommand,
    dto::{MediaDto, PaginatedResult},
    queries::media::ListMediaQuery,
};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::openapi::{MessageResponse, PageParams};
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    extract::{Path, Query},
};
use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;

/// Absent → `None`, `null` → `Some(None)`, value → `Some(Some(v))`.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateMediaRequest {
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    /// Post to attach to; `null` detaches, omitted keeps the current post.
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<i64>)]
    pub post_id: Option<Option<i64>>,
}

#[utoipa::path(
    get,
    path = "/api/media",
    params(PageParams),
    responses(
        (status = 200, description = "Media metadata, newest upload first.", body = PaginatedResult<MediaDto>),
        (status = 403, description = "Missing capability.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Media"
)]
pub async fn list_media(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Query(params): Query<PageParams>,
) -> HttpResult<Json<PaginatedResult<MediaDto>>> {
    let query = ListMediaQuery {
        page: params.page,
        limit: params.limit,
    };

    state
        .services
        .media_queries
        .list_media(&user, query)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/api/media/{id}",
    params(("id" = i64, Path, description = "Media id")),
    responses(
        (status = 200, description = "Media metadata with its post.", body = MediaDto),
        (status = 404, description = "Media not found.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Media"
)]
pub async fn get_media(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<i64>,
) -> HttpResult<Json<MediaDto>> {
    state
        .services
        .media_queries
        .get_media(&user, id)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    put,
    path = "/api/media/{id}",
    params(("id" = i64, Path, description = "Media id")),
    request_body = UpdateMediaRequest,
    responses(
        (status = 200, description = "Updated metadata.", body = MediaDto),
        (status = 404, description = "Media not found.", body = crate::presentation::http::error::ErrorResponse),
        (status = 422, description = "Unknown post id.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Media"
)]
pub async fn update_media(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateMediaRequest>,
) -> HttpResult<Json<MediaDto>> {
    let command = UpdateMediaCommand {
        alt_text: payload.alt_text,
        caption: payload.caption,
        post_id: payload.post_id,
    };

    state
        .services
        .media_commands
        .update_media(&user, id, command)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    delete,
    path = "/api/media/{id}",
    params(("id" = i64, Path, description = "Media id")),
    responses(
        (status = 200, description = "Record and file removed.", body = MessageResponse),
        (status = 404, description = "Media not found.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Media"
)]
pub async fn delete_media(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<i64>,
) -> HttpResult<Json<MessageResponse>> {
    state
        .services
        .media_commands
        .delete_media(&user, id)
        .await
        .into_http()?;

    Ok(Json(MessageResponse::new("Media deleted successfully")))
}
