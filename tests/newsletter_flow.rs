// tests/newsletter_flow.rs
use chrono::Duration;
use starlite_blog::application::{
    commands::newsletter::BulkSubscriberCommand,
    error::ApplicationError,
    queries::newsletter::ListSubscribersQuery,
};
use starlite_blog::domain::errors::DomainError;

mod support;
use support::{TestApp, admin, author};

#[tokio::test]
async fn subscribe_cycle_reports_each_transition() {
    let app = TestApp::new();
    let newsletter = &app.services.newsletter_commands;

    let created = newsletter.subscribe("Reader@Example.com".into()).await.unwrap();
    assert!(created.created);
    assert_eq!(created.message, "Successfully subscribed to our newsletter!");

    let again = newsletter.subscribe("reader@example.com".into()).await.unwrap();
    assert!(!again.created);
    assert_eq!(again.message, "You are already subscribed to our newsletter");

    let left = newsletter.unsubscribe("reader@example.com".into()).await.unwrap();
    assert_eq!(left.message, "Successfully unsubscribed from our newsletter");

    let left_again = newsletter.unsubscribe("reader@example.com".into()).await.unwrap();
    assert_eq!(left_again.message, "You are already unsubscribed from our newsletter");

    let back = newsletter.subscribe("reader@example.com".into()).await.unwrap();
    assert!(!back.created);
    assert_eq!(back.message, "Welcome back! Your subscription has been reactivated.");
}

#[tokio::test]
async fn malformed_email_is_rejected() {
    let app = TestApp::new();
    let err = app
        .services
        .newsletter_commands
        .subscribe("not-an-email".into())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::Validation(_))
    ));
}

#[tokio::test]
async fn unknown_email_cannot_unsubscribe() {
    let app = TestApp::new();
    let err = app
        .services
        .newsletter_commands
        .unsubscribe("ghost@example.com".into())
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::NotFound(_)));
}

#[tokio::test]
async fn listing_filters_by_status_and_requires_manage() {
    let app = TestApp::new();
    let newsletter = &app.services.newsletter_commands;
    for email in ["a@example.com", "b@example.com", "c@example.com"] {
        newsletter.subscribe(email.into()).await.unwrap();
    }
    newsletter.unsubscribe("b@example.com".into()).await.unwrap();

    let queries = &app.services.newsletter_queries;
    let active = queries
        .list_subscribers(
            &admin(),
            ListSubscribersQuery {
                page: None,
                limit: None,
                status: Some("active".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(active.total, 2);
    assert!(active.items.iter().all(|s| s.is_active));

    let err = queries
        .list_subscribers(
            &author(),
            ListSubscribersQuery {
                page: None,
                limit: None,
                status: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Forbidden(_)));
}

#[tokio::test]
async fn bulk_actions_report_affected_rows() {
    let app = TestApp::new();
    let newsletter = &app.services.newsletter_commands;
    newsletter.subscribe("a@example.com".into()).await.unwrap();
    newsletter.subscribe("b@example.com".into()).await.unwrap();

    let listed = app
        .services
        .newsletter_queries
        .list_subscribers(
            &admin(),
            ListSubscribersQuery {
                page: None,
                limit: None,
                status: None,
            },
        )
        .await
        .unwrap();
    let mut ids: Vec<i64> = listed.items.iter().map(|s| s.id).collect();
    ids.push(9_999);

    let result = newsletter
        .bulk_action(
            &admin(),
            BulkSubscriberCommand {
                action: "deactivate".into(),
                subscriber_ids: ids.clone(),
            },
        )
        .await
        .unwrap();
    assert_eq!(result.affected, 2);
    assert_eq!(result.message, "Bulk deactivate completed successfully");

    let deleted = newsletter
        .bulk_action(
            &admin(),
            BulkSubscriberCommand {
                action: "delete".into(),
                subscriber_ids: ids,
            },
        )
        .await
        .unwrap();
    assert_eq!(deleted.affected, 2);

    let empty = newsletter
        .bulk_action(
            &admin(),
            BulkSubscriberCommand {
                action: "activate".into(),
                subscriber_ids: vec![],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(empty, ApplicationError::Validation(_)));

    let unknown = newsletter
        .bulk_action(
            &admin(),
            BulkSubscriberCommand {
                action: "archive".into(),
                subscriber_ids: vec![1],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        unknown,
        ApplicationError::Domain(DomainError::Validation(_))
    ));
}

#[tokio::test]
async fn delete_subscriber_is_not_found_the_second_time() {
    let app = TestApp::new();
    app.services
        .newsletter_commands
        .subscribe("gone@example.com".into())
        .await
        .unwrap();
    let id = app
        .services
        .newsletter_queries
        .list_subscribers(
            &admin(),
            ListSubscribersQuery {
                page: None,
                limit: None,
                status: None,
            },
        )
        .await
        .unwrap()
        .items[0]
        .id;

    let commands = &app.services.newsletter_commands;
    commands.delete_subscriber(&admin(), id).await.unwrap();
    let err = commands.delete_subscriber(&admin(), id).await.unwrap_err();
    assert!(matches!(err, ApplicationError::NotFound(_)));
}

#[tokio::test]
async fn stats_count_recent_growth() {
    let app = TestApp::new();
    let newsletter = &app.services.newsletter_commands;
    newsletter.subscribe("old@example.com".into()).await.unwrap();
    app.clock.advance(Duration::days(20));
    newsletter.subscribe("new@example.com".into()).await.unwrap();
    newsletter.subscribe("newer@example.com".into()).await.unwrap();
    newsletter.unsubscribe("old@example.com".into()).await.unwrap();

    let stats = app.services.newsletter_queries.stats(&admin()).await.unwrap();
    let overview = stats.overview;
    assert_eq!(overview.total_subscribers, 3);
    assert_eq!(overview.active_subscribers, 2);
    assert_eq!(overview.inactive_subscribers, 1);
    assert_eq!(overview.recent_subscriptions, 2);
    assert_eq!(overview.growth_rate, 66.67);

    let total: u64 = stats.monthly_growth.iter().map(|m| m.subscriptions).sum();
    assert_eq!(total, 3);
}
