// tests/media_flow.rs
use axum::http::{Method, StatusCode};
use chrono::Duration;
use serde_json::json;
use starlite_blog::application::{
    commands::{
        media::UpdateMediaCommand,
        posts::{CreatePostCommand, DeletePostCommand},
    },
    error::ApplicationError,
    queries::media::ListMediaQuery,
};
use starlite_blog::domain::errors::DomainError;

mod support;
use support::{
    ADMIN_TOKEN, AUTHOR_TOKEN, FIXED_NOW, MediaSeed, TestApp, admin, assert_error_response,
    author, json_body, send,
};

fn upload(name: &str, minutes_ago: i64, post_id: Option<i64>) -> MediaSeed {
    MediaSeed {
        original_name: name.into(),
        mime_type: "image/png".into(),
        size: 2048,
        post_id,
        created_at: *FIXED_NOW - Duration::minutes(minutes_ago),
    }
}

async fn seed_post(app: &TestApp, title: &str) -> i64 {
    app.services
        .post_commands
        .create_post(
            &admin(),
            CreatePostCommand::builder()
                .title(title)
                .content("body")
                .build()
                .unwrap(),
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn listing_is_newest_first_and_paged() {
    let app = TestApp::new();
    app.store.seed_media(upload("old.png", 30, None));
    app.store.seed_media(upload("new.png", 1, None));
    app.store.seed_media(upload("mid.png", 10, None));

    let page = app
        .services
        .media_queries
        .list_media(
            &admin(),
            ListMediaQuery {
                page: Some(1),
                limit: Some(2),
            },
        )
        .await
        .unwrap();

    let names: Vec<_> = page.items.iter().map(|m| m.original_name.as_str()).collect();
    assert_eq!(names, ["new.png", "mid.png"]);
    assert_eq!(page.total, 3);
    assert_eq!(page.total_pages, 2);
}

#[tokio::test]
async fn single_item_carries_its_post() {
    let app = TestApp::new();
    let post_id = seed_post(&app, "Cover Story").await;
    let id = app.store.seed_media(upload("cover.png", 0, Some(post_id)));

    let media = app.services.media_queries.get_media(&admin(), id).await.unwrap();
    let post = media.post.unwrap();
    assert_eq!(post.id, post_id);
    assert_eq!(post.slug, "cover-story");
    assert_eq!(media.url, format!("/uploads/{}", media.filename));
}

#[tokio::test]
async fn update_changes_only_supplied_fields() {
    let app = TestApp::new();
    let post_id = seed_post(&app, "Gallery").await;
    let id = app.store.seed_media(upload("photo.png", 0, None));
    let media = &app.services.media_commands;

    let first = media
        .update_media(
            &admin(),
            id,
            UpdateMediaCommand {
                alt_text: Some("Team photo".into()),
                post_id: Some(Some(post_id)),
                ..UpdateMediaCommand::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(first.alt_text, "Team photo");
    assert_eq!(first.post.as_ref().map(|p| p.id), Some(post_id));

    let second = media
        .update_media(
            &admin(),
            id,
            UpdateMediaCommand {
                caption: Some("Offsite 2024".into()),
                ..UpdateMediaCommand::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(second.alt_text, "Team photo");
    assert_eq!(second.caption, "Offsite 2024");
    assert!(second.post.is_some());

    let detached = media
        .update_media(
            &admin(),
            id,
            UpdateMediaCommand {
                post_id: Some(None),
                ..UpdateMediaCommand::default()
            },
        )
        .await
        .unwrap();
    assert!(detached.post.is_none());
    assert_eq!(detached.caption, "Offsite 2024");
}

#[tokio::test]
async fn update_rejects_unknown_media_and_posts() {
    let app = TestApp::new();
    let id = app.store.seed_media(upload("photo.png", 0, None));
    let media = &app.services.media_commands;

    let err = media
        .update_media(&admin(), 4242, UpdateMediaCommand::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::NotFound(_)));

    let err = media
        .update_media(
            &admin(),
            id,
            UpdateMediaCommand {
                post_id: Some(Some(4242)),
                ..UpdateMediaCommand::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::InvalidReference(_))
    ));
}

#[tokio::test]
async fn deleting_a_post_detaches_its_media() {
    let app = TestApp::new();
    let post_id = seed_post(&app, "Short lived").await;
    let id = app.store.seed_media(upload("photo.png", 0, Some(post_id)));

    app.services
        .post_commands
        .delete_post(&admin(), DeletePostCommand { id: post_id })
        .await
        .unwrap();

    let media = app.services.media_queries.get_media(&admin(), id).await.unwrap();
    assert!(media.post.is_none());
}

#[tokio::test]
async fn delete_removes_record_and_file() {
    let app = TestApp::new();
    let id = app.store.seed_media(upload("photo.png", 0, None));
    let filename = app
        .services
        .media_queries
        .get_media(&admin(), id)
        .await
        .unwrap()
        .filename;

    app.services.media_commands.delete_media(&admin(), id).await.unwrap();
    assert_eq!(app.store.media_count(), 0);
    assert_eq!(app.files.removed(), vec![filename]);

    let err = app
        .services
        .media_commands
        .delete_media(&admin(), id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::NotFound(_)));
}

#[tokio::test]
async fn file_removal_failure_still_deletes_the_record() {
    let app = TestApp::new();
    let id = app.store.seed_media(upload("photo.png", 0, None));
    let filename = app
        .services
        .media_queries
        .get_media(&admin(), id)
        .await
        .unwrap()
        .filename;
    app.files.fail_on(&filename);

    app.services.media_commands.delete_media(&admin(), id).await.unwrap();
    assert_eq!(app.store.media_count(), 0);
    assert!(app.files.removed().is_empty());
}

#[tokio::test]
async fn authors_cannot_manage_media() {
    let app = TestApp::new();
    let id = app.store.seed_media(upload("photo.png", 0, None));

    let err = app
        .services
        .media_queries
        .list_media(&author(), ListMediaQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Forbidden(_)));

    let err = app
        .services
        .media_commands
        .delete_media(&author(), id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Forbidden(_)));
    assert_eq!(app.store.media_count(), 1);
}

#[tokio::test]
async fn media_routes_over_http() {
    let app = TestApp::new();
    let router = app.router();
    let id = app.store.seed_media(upload("photo.png", 0, None));

    let resp = send(&router, Method::GET, "/api/media", Some(ADMIN_TOKEN), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["original_name"], "photo.png");

    let resp = send(
        &router,
        Method::PUT,
        &format!("/api/media/{id}"),
        Some(ADMIN_TOKEN),
        Some(json!({ "alt_text": "Sunset", "post_id": null })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["alt_text"], "Sunset");

    let resp = send(
        &router,
        Method::PUT,
        &format!("/api/media/{id}"),
        Some(ADMIN_TOKEN),
        Some(json!({ "post_id": 4242 })),
    )
    .await;
    assert_error_response(resp, StatusCode::UNPROCESSABLE_ENTITY, "Unprocessable Entity").await;

    let resp = send(&router, Method::GET, "/api/media", Some(AUTHOR_TOKEN), None).await;
    assert_error_response(resp, StatusCode::FORBIDDEN, "Forbidden").await;

    let resp = send(&router, Method::DELETE, &format!("/api/media/{id}"), Some(ADMIN_TOKEN), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["message"], "Media deleted successfully");

    let resp = send(&router, Method::GET, &format!("/api/media/{id}"), Some(ADMIN_TOKEN), None).await;
    assert_error_response(resp, StatusCode::NOT_FOUND, "Not Found").await;
}
