// src/presentation/http/controllers/tags.rs
use crate::application::dto::{TagDetailDto, TagDto, TagWithCountDto};
use crate::presentation::http::error::{HttpError, HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::openapi::{MessageResponse, PageParams};
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    extract::{Path, Query},
    http::StatusCode,
};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct TagRequest {
    pub name: Option<String>,
}

impl TagRequest {
    fn into_name(self) -> HttpResult<String> {
        self.name
            .ok_or_else(|| HttpError::bad_request("name is required"))
    }
}

#[utoipa::path(
    get,
    path = "/api/tags",
    responses(
        (status = 200, description = "Tags by name with published-post counts.", body = [TagWithCountDto])
    ),
    security(()),
    tag = "Tags"
)]
pub async fn list_tags(
    Extension(state): Extension<HttpState>,
) -> HttpResult<Json<Vec<TagWithCountDto>>> {
    state
        .services
        .taxonomy_queries
        .list_tags()
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/api/tags/{slug}",
    params(("slug" = String, Path, description = "Tag slug"), PageParams),
    responses(
        (status = 200, description = "Tag with a page of its published posts.", body = TagDetailDto),
        (status = 404, description = "Unknown slug.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(()),
    tag = "Tags"
)]
pub async fn get_tag(
    Extension(state): Extension<HttpState>,
    Path(slug): Path<String>,
    Query(page): Query<PageParams>,
) -> HttpResult<Json<TagDetailDto>> {
    state
        .services
        .taxonomy_queries
        .get_tag(&slug, page.page, page.limit)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/api/tags",
    request_body = TagRequest,
    responses(
        (status = 201, description = "Tag created.", body = TagDto),
        (status = 400, description = "Missing or blank name.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Tags"
)]
pub async fn create_tag(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Json(payload): Json<TagRequest>,
) -> HttpResult<(StatusCode, Json<TagDto>)> {
    let name = payload.into_name()?;
    let tag = state
        .services
        .tag_commands
        .create_tag(&user, name)
        .await
        .into_http()?;

    Ok((StatusCode::CREATED, Json(tag)))
}

#[utoipa::path(
    put,
    path = "/api/tags/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    request_body = TagRequest,
    responses(
        (status = 200, description = "Tag renamed.", body = TagDto),
        (status = 400, description = "Missing or blank name.", body = crate::presentation::http::error::ErrorResponse),
        (status = 404, description = "Tag not found.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Tags"
)]
pub async fn update_tag(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<i64>,
    Json(payload): Json<TagRequest>,
) -> HttpResult<Json<TagDto>> {
    let name = payload.into_name()?;
    state
        .services
        .tag_commands
        .rename_tag(&user, id, name)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    delete,
    path = "/api/tags/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag deleted.", body = MessageResponse),
        (status = 400, description = "Posts still linked.", body = crate::presentation::http::error::ErrorResponse),
        (status = 404, description = "Tag not found.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Tags"
)]
pub async fn delete_tag(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<i64>,
) -> HttpResult<Json<MessageResponse>> {
    state
        .services
        .tag_commands
        .delete_tag(&user, id)
        .await
        .into_http()?;

    Ok(Json(MessageResponse::new("Tag deleted successfully")))
}
