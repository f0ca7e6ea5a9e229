// src/presentation/http/controllers/auth.rs
use crate::application::{
    commands::users::{ChangePasswordCommand, LoginUserCommand, RegisterAdminCommand},
    dto::{LoginResultDto, UserDto, UserProfileDto},
};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::{Authenticated, MaybeAuthenticated};
use crate::presentation::http::openapi::MessageResponse;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, http::StatusCode};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterAdminRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in.", body = LoginResultDto),
        (status = 401, description = "Unknown email or wrong password.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(()),
    tag = "Auth"
)]
pub async fn login(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<LoginRequest>,
) -> HttpResult<Json<LoginResultDto>> {
    let command = LoginUserCommand {
        email: payload.email,
        password: payload.password,
    };

    state
        .services
        .user_commands
        .login(command)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current account.", body = UserProfileDto),
        (status = 401, description = "Missing or invalid token.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn me(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
) -> HttpResult<Json<UserProfileDto>> {
    state
        .services
        .user_queries
        .get_profile(&user)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/api/auth/register-admin",
    request_body = RegisterAdminRequest,
    responses(
        (status = 201, description = "Administrator created.", body = UserDto),
        (status = 400, description = "Invalid email, name or password.", body = crate::presentation::http::error::ErrorResponse),
        (status = 401, description = "Token required once an account exists.", body = crate::presentation::http::error::ErrorResponse),
        (status = 409, description = "Email already registered.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn register_admin(
    Extension(state): Extension<HttpState>,
    actor: MaybeAuthenticated,
    Json(payload): Json<RegisterAdminRequest>,
) -> HttpResult<(StatusCode, Json<UserDto>)> {
    let command = RegisterAdminCommand {
        email: payload.email,
        password: payload.password,
        name: payload.name,
    };

    let user = state
        .services
        .user_commands
        .register_admin(actor.0.as_ref(), command)
        .await
        .into_http()?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    put,
    path = "/api/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed.", body = MessageResponse),
        (status = 400, description = "Wrong current password or weak new password.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn change_password(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Json(payload): Json<ChangePasswordRequest>,
) -> HttpResult<Json<MessageResponse>> {
    let command = ChangePasswordCommand {
        current_password: payload.current_password,
        new_password: payload.new_password,
    };

    state
        .services
        .user_commands
        .change_password(&user, command)
        .await
        .into_http()?;

    Ok(Json(MessageResponse::new("Password changed successfully")))
}
