// src/presentation/http/extractors.rs
use crate::{
    application::{
        dto::{AuthenticatedUser, VisitorContext},
        error::ApplicationError,
    },
    presentation::http::state::HttpState,
};
use axum::{
    Extension,
    extract::{ConnectInfo, FromRequestParts},
    http::{header, request::Parts},
};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};
use std::{convert::Infallible, net::SocketAddr};

use super::error::HttpError;

/// Principal from a valid bearer token; rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthenticatedUser);

/// Principal when a bearer token is present. A present but invalid token is
/// still rejected.
#[derive(Debug, Clone)]
pub struct MaybeAuthenticated(pub Option<AuthenticatedUser>);

async fn http_state<S: Send + Sync>(parts: &mut Parts, state: &S) -> Result<HttpState, HttpError> {
    let Extension(app_state) = Extension::<HttpState>::from_request_parts(parts, state)
        .await
        .map_err(|_| {
            HttpError::from_error(ApplicationError::infrastructure(
                "application state missing",
            ))
        })?;
    Ok(app_state)
}

async fn verify_bearer(
    app_state: &HttpState,
    header: Authorization<Bearer>,
) -> Result<AuthenticatedUser, HttpError> {
    app_state
        .services
        .authenticate(header.token())
        .await
        .map_err(HttpError::from_error)
}

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = http_state(parts, state).await?;
        let header = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .ok_or_else(|| {
                HttpError::from_error(ApplicationError::unauthorized(
                    "missing Authorization header",
                ))
            })?;

        verify_bearer(&app_state, header).await.map(Self)
    }
}

impl<S> FromRequestParts<S> for MaybeAuthenticated
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = http_state(parts, state).await?;
        match parts.headers.typed_get::<Authorization<Bearer>>() {
            Some(header) => verify_bearer(&app_state, header)
                .await
                .map(|user| Self(Some(user))),
            None => Ok(Self(None)),
        }
    }
}

/// Client metadata stored with post views.
#[derive(Debug, Clone, Default)]
pub struct Visitor(pub VisitorContext);

fn header_text(parts: &Parts, name: header::HeaderName) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn client_ip(parts: &Parts) -> Option<String> {
    let forwarded = header_text(parts, header::HeaderName::from_static("x-forwarded-for"))
        .and_then(|list| list.split(',').next().map(|ip| ip.trim().to_string()))
        .filter(|ip| !ip.is_empty());

    forwarded.or_else(|| {
        parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
    })
}

impl<S> FromRequestParts<S> for Visitor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(VisitorContext {
            ip_address: client_ip(parts),
            user_agent: header_text(parts, header::USER_AGENT),
            referrer: header_text(parts, header::REFERER),
        }))
    }
}
