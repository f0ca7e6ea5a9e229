// src/presentation/http/controllers/newsletter.rs
use crate::application::{
    commands::newsletter::BulkSubscriberCommand,
    dto::{
        BulkActionResultDto, NewsletterStatsDto, PaginatedResult, SubscriberDto,
        SubscriptionResultDto,
    },
    queries::newsletter::ListSubscribersQuery,
};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::openapi::MessageResponse;
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    extract::{Path, Query},
    http::StatusCode,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SubscriberListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// `all`, `active` or `inactive`.
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkActionRequest {
    /// `activate`, `deactivate` or `delete`.
    pub action: String,
    pub subscriber_ids: Vec<i64>,
}

fn subscription_response(result: SubscriptionResultDto) -> (StatusCode, Json<SubscriptionResultDto>) {
    let status = if result.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (status, Json(result))
}

#[utoipa::path(
    post,
    path = "/api/newsletter/subscribe",
    request_body = EmailRequest,
    responses(
        (status = 201, description = "New subscriber.", body = SubscriptionResultDto),
        (status = 200, description = "Already subscribed or reactivated.", body = SubscriptionResultDto),
        (status = 400, description = "Malformed email.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(()),
    tag = "Newsletter"
)]
pub async fn subscribe(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<EmailRequest>,
) -> HttpResult<(StatusCode, Json<SubscriptionResultDto>)> {
    state
        .services
        .newsletter_commands
        .subscribe(payload.email)
        .await
        .into_http()
        .map(subscription_response)
}

#[utoipa::path(
    post,
    path = "/api/newsletter/unsubscribe",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Unsubscribed or already inactive.", body = SubscriptionResultDto),
        (status = 404, description = "Unknown email.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(()),
    tag = "Newsletter"
)]
pub async fn unsubscribe(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<EmailRequest>,
) -> HttpResult<(StatusCode, Json<SubscriptionResultDto>)> {
    state
        .services
        .newsletter_commands
        .unsubscribe(payload.email)
        .await
        .into_http()
        .map(subscription_response)
}

#[utoipa::path(
    get,
    path = "/api/newsletter/subscribers",
    params(SubscriberListParams),
    responses(
        (status = 200, description = "Subscribers, newest first.", body = PaginatedResult<SubscriberDto>),
        (status = 403, description = "Missing capability.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Newsletter"
)]
pub async fn list_subscribers(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Query(params): Query<SubscriberListParams>,
) -> HttpResult<Json<PaginatedResult<SubscriberDto>>> {
    let query = ListSubscribersQuery {
        page: params.page,
        limit: params.limit,
        status: params.status,
    };

    state
        .services
        .newsletter_queries
        .list_subscribers(&user, query)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/api/newsletter/stats",
    responses(
        (status = 200, description = "Subscription totals and monthly growth.", body = NewsletterStatsDto)
    ),
    tag = "Newsletter"
)]
pub async fn stats(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
) -> HttpResult<Json<NewsletterStatsDto>> {
    state
        .services
        .newsletter_queries
        .stats(&user)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    delete,
    path = "/api/newsletter/subscribers/{id}",
    params(("id" = i64, Path, description = "Subscriber id")),
    responses(
        (status = 200, description = "Subscriber removed.", body = MessageResponse),
        (status = 404, description = "Subscriber not found.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Newsletter"
)]
pub async fn delete_subscriber(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<i64>,
) -> HttpResult<Json<MessageResponse>> {
    state
        .services
        .newsletter_commands
        .delete_subscriber(&user, id)
        .await
        .into_http()?;

    Ok(Json(MessageResponse::new("Subscriber deleted successfully")))
}

#[utoipa::path(
    post,
    path = "/api/newsletter/bulk-action",
    request_body = BulkActionRequest,
    responses(
        (status = 200, description = "Action applied.", body = BulkActionResultDto),
        (status = 400, description = "Unknown action or empty id list.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Newsletter"
)]
pub async fn bulk_action(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Json(payload): Json<BulkActionRequest>,
) -> HttpResult<Json<BulkActionResultDto>> {
    let command = BulkSubscriberCommand {
        action: payload.action,
        subscriber_ids: payload.subscriber_ids,
    };

    state
        .services
        .newsletter_commands
        .bulk_action(&user, command)
        .await
        .into_http()
        .map(Json)
}
