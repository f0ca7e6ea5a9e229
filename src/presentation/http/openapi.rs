// src/presentation/http/openapi.rs
use crate::presentation::http::controllers::{
    analytics, auth, categories, media, newsletter, posts, system, tags,
};
use axum::{Router, response::Redirect, routing::get};
use serde::{Deserialize, Serialize};
use utoipa::openapi::{
    Components,
    security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa::{IntoParams, Modify, OpenApi, ToSchema};
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `page` / `limit` query pair shared by paged listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        system::health,
        auth::login,
        auth::me,
        auth::register_admin,
        auth::change_password,
        posts::list_posts,
        posts::list_all_posts,
        posts::get_post,
        posts::create_post,
        posts::update_post,
        posts::delete_post,
        posts::replace_categories,
        posts::replace_tags,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        tags::list_tags,
        tags::get_tag,
        tags::create_tag,
        tags::update_tag,
        tags::delete_tag,
        newsletter::subscribe,
        newsletter::unsubscribe,
        newsletter::list_subscribers,
        newsletter::stats,
        newsletter::delete_subscriber,
        newsletter::bulk_action,
        analytics::dashboard,
        analytics::post_analytics,
        analytics::trends,
        analytics::track,
        media::list_media,
        media::get_media,
        media::update_media,
        media::delete_media
    ),
    components(
        schemas(
            StatusResponse,
            MessageResponse,
            crate::presentation::http::error::ErrorResponse,
            auth::LoginRequest,
            auth::RegisterAdminRequest,
            auth::ChangePasswordRequest,
            posts::CreatePostRequest,
            posts::UpdatePostRequest,
            posts::ReplaceCategoriesRequest,
            posts::ReplaceTagsRequest,
            categories::CreateCategoryRequest,
            categories::UpdateCategoryRequest,
            tags::TagRequest,
            newsletter::EmailRequest,
            newsletter::BulkActionRequest,
            analytics::TrackRequest,
            media::UpdateMediaRequest,
            crate::application::dto::UserDto,
            crate::application::dto::UserProfileDto,
            crate::application::dto::CapabilityView,
            crate::application::dto::AuthTokenDto,
            crate::application::dto::LoginResultDto,
            crate::application::dto::PostDto,
            crate::application::dto::AuthorDto,
            crate::application::dto::LinkedTermDto,
            crate::application::dto::PostLinksDto,
            crate::application::dto::CategoryDto,
            crate::application::dto::CategoryWithCountDto,
            crate::application::dto::CategoryDetailDto,
            crate::application::dto::TagDto,
            crate::application::dto::TagWithCountDto,
            crate::application::dto::TagDetailDto,
            crate::application::dto::SubscriberDto,
            crate::application::dto::SubscriptionResultDto,
            crate::application::dto::NewsletterStatsDto,
            crate::application::dto::NewsletterOverviewDto,
            crate::application::dto::MonthlyCountDto,
            crate::application::dto::BulkActionResultDto,
            crate::application::dto::DashboardDto,
            crate::application::dto::DashboardOverviewDto,
            crate::application::dto::PostSummaryDto,
            crate::application::dto::PostAnalyticsDto,
            crate::application::dto::PostViewStatsDto,
            crate::application::dto::DailyViewsDto,
            crate::application::dto::ReferrerCountDto,
            crate::application::dto::BrowserCountDto,
            crate::application::dto::TrendsDto,
            crate::application::dto::MediaDto,
            crate::application::dto::MediaPostDto
        )
    ),
    tags(
        (name = "Auth", description = "Administrator accounts and tokens"),
        (name = "Posts", description = "Posts and their category and tag links"),
        (name = "Categories", description = "Category taxonomy"),
        (name = "Tags", description = "Tag taxonomy"),
        (name = "Newsletter", description = "Newsletter subscriptions"),
        (name = "Analytics", description = "Post views and site statistics"),
        (name = "Media", description = "Metadata of uploaded files"),
        (name = "System", description = "System level endpoints")
    ),
    modifiers(&BearerAuth),
    security(("bearerAuth" = [])),
    info(
        title = "Starlite Blog API",
        description = "Blog backend with posts, taxonomy, media, newsletter and analytics",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Components::default);
        let mut http = Http::new(HttpAuthScheme::Bearer);
        http.bearer_format = Some("Biscuit".into());
        components.add_security_scheme("bearerAuth", SecurityScheme::Http(http));
    }
}

pub fn docs_router() -> Router {
    let openapi = ApiDoc::openapi();
    let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi.clone());
    let redoc = Redoc::with_url("/redoc", openapi);
    Router::new()
        .merge(swagger)
        .merge(redoc)
        .route("/", get(|| async { Redirect::permanent("/docs") }))
}
