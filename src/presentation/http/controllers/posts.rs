// src/presentation/http/controllers/posts.rs
use crate::application::{
    commands::posts::{
        CreatePostCommand, DeletePostCommand, ReplacePostLinksCommand, UpdatePostCommand,
    },
    dto::{PaginatedResult, PostDto, PostLinksDto},
    queries::posts::{ListAllPostsQuery, ListPostsQuery},
};
use crate::domain::post::LinkKind;
use crate::presentation::http::error::{HttpError, HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::{Authenticated, Visitor};
use crate::presentation::http::openapi::MessageResponse;
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    extract::{Path, Query},
    http::StatusCode,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PostListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Category slug.
    pub category: Option<String>,
    /// Tag slug.
    pub tag: Option<String>,
    /// Case-insensitive match on title, excerpt and content.
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AdminPostListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// `published` or `draft`; every post when absent.
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub meta_description: Option<String>,
    pub featured_image: Option<String>,
    pub reading_time: Option<i32>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub category_ids: Vec<i64>,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub meta_description: Option<String>,
    pub featured_image: Option<String>,
    pub reading_time: Option<i32>,
    pub is_published: Option<bool>,
    pub category_ids: Option<Vec<i64>>,
    pub tag_ids: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplaceCategoriesRequest {
    pub category_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplaceTagsRequest {
    pub tag_ids: Vec<i64>,
}

/// Numeric segment of `/api/posts/{post}` for write routes.
fn post_id(raw: &str) -> HttpResult<i64> {
    raw.parse()
        .map_err(|_| HttpError::bad_request(format!("invalid post id '{raw}'")))
}

#[utoipa::path(
    get,
    path = "/api/posts",
    params(PostListParams),
    responses(
        (status = 200, description = "Published posts, newest first.", body = PaginatedResult<PostDto>),
        (status = 400, description = "Invalid paging or filter.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(()),
    tag = "Posts"
)]
pub async fn list_posts(
    Extension(state): Extension<HttpState>,
    Query(params): Query<PostListParams>,
) -> HttpResult<Json<PaginatedResult<PostDto>>> {
    let query = ListPostsQuery {
        page: params.page,
        limit: params.limit,
        category: params.category,
        tag: params.tag,
        search: params.search,
    };

    state
        .services
        .post_queries
        .list_published(query)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/api/posts/admin/all",
    params(AdminPostListParams),
    responses(
        (status = 200, description = "All posts including drafts.", body = PaginatedResult<PostDto>),
        (status = 403, description = "Missing capability.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Posts"
)]
pub async fn list_all_posts(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Query(params): Query<AdminPostListParams>,
) -> HttpResult<Json<PaginatedResult<PostDto>>> {
    let query = ListAllPostsQuery {
        page: params.page,
        limit: params.limit,
        status: params.status,
    };

    state
        .services
        .post_queries
        .list_all(&user, query)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/api/posts/{slug}",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "Published post; the read is counted.", body = PostDto),
        (status = 404, description = "Unknown slug or draft.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(()),
    tag = "Posts"
)]
pub async fn get_post(
    Extension(state): Extension<HttpState>,
    Visitor(visitor): Visitor,
    Path(slug): Path<String>,
) -> HttpResult<Json<PostDto>> {
    let details = state
        .services
        .post_queries
        .get_published_by_slug(&slug)
        .await
        .into_http()?;

    state
        .services
        .analytics_commands
        .record_read(details.post.id, visitor)
        .await
        .into_http()?;

    let mut post = PostDto::from(details);
    post.view_count += 1;
    Ok(Json(post))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created.", body = PostDto),
        (status = 400, description = "Missing title or content.", body = crate::presentation::http::error::ErrorResponse),
        (status = 422, description = "Unknown category or tag id.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Posts"
)]
pub async fn create_post(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Json(payload): Json<CreatePostRequest>,
) -> HttpResult<(StatusCode, Json<PostDto>)> {
    let command = CreatePostCommand::builder()
        .title(payload.title)
        .content(payload.content)
        .excerpt(payload.excerpt)
        .meta_description(payload.meta_description)
        .featured_image(payload.featured_image)
        .reading_time(payload.reading_time)
        .publish(payload.is_published)
        .category_ids(payload.category_ids)
        .tag_ids(payload.tag_ids)
        .build()
        .map_err(HttpError::bad_request)?;

    let post = state
        .services
        .post_commands
        .create_post(&user, command)
        .await
        .into_http()?;

    Ok((StatusCode::CREATED, Json(post)))
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    params(("id" = i64, Path, description = "Post id")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated.", body = PostDto),
        (status = 404, description = "Post not found.", body = crate::presentation::http::error::ErrorResponse),
        (status = 422, description = "Unknown category or tag id.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Posts"
)]
pub async fn update_post(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(raw_id): Path<String>,
    Json(payload): Json<UpdatePostRequest>,
) -> HttpResult<Json<PostDto>> {
    let command = UpdatePostCommand {
        id: post_id(&raw_id)?,
        title: payload.title,
        content: payload.content,
        excerpt: payload.excerpt,
        meta_description: payload.meta_description,
        featured_image: payload.featured_image,
        reading_time: payload.reading_time,
        publish: payload.is_published,
        category_ids: payload.category_ids,
        tag_ids: payload.tag_ids,
    };

    state
        .services
        .post_commands
        .update_post(&user, command)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post deleted.", body = MessageResponse),
        (status = 404, description = "Post not found.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Posts"
)]
pub async fn delete_post(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(raw_id): Path<String>,
) -> HttpResult<Json<MessageResponse>> {
    let id = post_id(&raw_id)?;
    state
        .services
        .post_commands
        .delete_post(&user, DeletePostCommand { id })
        .await
        .into_http()?;

    Ok(Json(MessageResponse::new("Post deleted successfully")))
}

async fn replace_links(
    state: &HttpState,
    user: &crate::application::dto::AuthenticatedUser,
    raw_id: &str,
    kind: LinkKind,
    target_ids: Vec<i64>,
) -> HttpResult<Json<PostLinksDto>> {
    let command = ReplacePostLinksCommand {
        post_id: post_id(raw_id)?,
        kind,
        target_ids,
    };

    state
        .services
        .post_commands
        .replace_links(user, command)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}/categories",
    params(("id" = i64, Path, description = "Post id")),
    request_body = ReplaceCategoriesRequest,
    responses(
        (status = 200, description = "Categories replaced.", body = PostLinksDto),
        (status = 404, description = "Post not found.", body = crate::presentation::http::error::ErrorResponse),
        (status = 422, description = "Unknown category id.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Posts"
)]
pub async fn replace_categories(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(raw_id): Path<String>,
    Json(payload): Json<ReplaceCategoriesRequest>,
) -> HttpResult<Json<PostLinksDto>> {
    replace_links(&state, &user, &raw_id, LinkKind::Category, payload.category_ids).await
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}/tags",
    params(("id" = i64, Path, description = "Post id")),
    request_body = ReplaceTagsRequest,
    responses(
        (status = 200, description = "Tags replaced.", body = PostLinksDto),
        (status = 404, description = "Post not found.", body = crate::presentation::http::error::ErrorResponse),
        (status = 422, description = "Unknown tag id.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Posts"
)]
pub async fn replace_tags(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(raw_id): Path<String>,
    Json(payload): Json<ReplaceTagsRequest>,
) -> HttpResult<Json<PostLinksDto>> {
    replace_links(&state, &user, &raw_id, LinkKind::Tag, payload.tag_ids).await
}
