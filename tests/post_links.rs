// tests/post_links.rs
use starlite_blog::application::{
    commands::{
        categories::CreateCategoryCommand,
        posts::{CreatePostCommand, ReplacePostLinksCommand},
    },
    error::ApplicationError,
};
use starlite_blog::domain::{
    errors::DomainError,
    post::{LinkKind, PostId, PostLinkRepository},
};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

mod support;
use support::{TestApp, admin, author};

async fn seed_categories(app: &TestApp, names: &[&str]) -> Vec<i64> {
    let mut ids = Vec::new();
    for name in names {
        let created = app
            .services
            .category_commands
            .create_category(
                &admin(),
                CreateCategoryCommand {
                    name: (*name).into(),
                    description: None,
                    color: None,
                },
            )
            .await
            .unwrap();
        ids.push(created.id);
    }
    ids
}

async fn seed_post(app: &TestApp, category_ids: Vec<i64>) -> i64 {
    app.services
        .post_commands
        .create_post(
            &admin(),
            CreatePostCommand::builder()
                .title("Linked post")
                .content("body")
                .category_ids(category_ids)
                .build()
                .unwrap(),
        )
        .await
        .unwrap()
        .id
}

async fn replace(
    app: &TestApp,
    post_id: i64,
    kind: LinkKind,
    ids: Vec<i64>,
) -> Result<BTreeSet<i64>, ApplicationError> {
    app.services
        .post_commands
        .replace_links(
            &admin(),
            ReplacePostLinksCommand {
                post_id,
                kind,
                target_ids: ids,
            },
        )
        .await
        .map(|dto| dto.ids.into_iter().collect())
}

#[tokio::test]
async fn replacement_leaves_exactly_the_new_set() {
    let app = TestApp::new();
    let ids = seed_categories(&app, &["A", "B", "C"]).await;
    let (a, b, c) = (ids[0], ids[1], ids[2]);
    let post_id = seed_post(&app, vec![a, b]).await;

    let current = replace(&app, post_id, LinkKind::Category, vec![b, c])
        .await
        .unwrap();

    assert_eq!(current, BTreeSet::from([b, c]));
}

#[tokio::test]
async fn empty_set_clears_links() {
    let app = TestApp::new();
    let ids = seed_categories(&app, &["A", "B"]).await;
    let post_id = seed_post(&app, ids).await;

    let current = replace(&app, post_id, LinkKind::Category, vec![])
        .await
        .unwrap();

    assert!(current.is_empty());
}

#[tokio::test]
async fn replacing_twice_is_idempotent() {
    let app = TestApp::new();
    let ids = seed_categories(&app, &["A", "B"]).await;
    let post_id = seed_post(&app, vec![]).await;

    let first = replace(&app, post_id, LinkKind::Category, ids.clone())
        .await
        .unwrap();
    let second = replace(&app, post_id, LinkKind::Category, ids.clone())
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(second, ids.into_iter().collect::<BTreeSet<_>>());
}

#[tokio::test]
async fn duplicate_ids_collapse() {
    let app = TestApp::new();
    let ids = seed_categories(&app, &["A"]).await;
    let post_id = seed_post(&app, vec![]).await;

    let current = replace(&app, post_id, LinkKind::Category, vec![ids[0], ids[0]])
        .await
        .unwrap();

    assert_eq!(current, BTreeSet::from([ids[0]]));
}

#[tokio::test]
async fn missing_post_is_not_found() {
    let app = TestApp::new();
    let err = replace(&app, 9_999, LinkKind::Tag, vec![])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::NotFound(_))
    ));
}

#[tokio::test]
async fn unknown_target_is_rejected_and_existing_links_survive() {
    let app = TestApp::new();
    let ids = seed_categories(&app, &["A"]).await;
    let post_id = seed_post(&app, ids.clone()).await;

    let err = replace(&app, post_id, LinkKind::Category, vec![ids[0], 4_242])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::InvalidReference(_))
    ));

    let current = app
        .store
        .links_of(PostId(post_id), LinkKind::Category)
        .await
        .unwrap();
    assert_eq!(current, BTreeSet::from([ids[0]]));
}

#[tokio::test]
async fn category_and_tag_links_are_independent() {
    let app = TestApp::new();
    let ids = seed_categories(&app, &["A"]).await;
    let post_id = seed_post(&app, ids.clone()).await;
    let tag = app
        .services
        .tag_commands
        .create_tag(&admin(), "Rust".into())
        .await
        .unwrap();

    replace(&app, post_id, LinkKind::Tag, vec![tag.id])
        .await
        .unwrap();

    let categories = app
        .store
        .links_of(PostId(post_id), LinkKind::Category)
        .await
        .unwrap();
    assert_eq!(categories, BTreeSet::from([ids[0]]));
}

#[tokio::test]
async fn authors_cannot_replace_links() {
    let app = TestApp::new();
    let post_id = seed_post(&app, vec![]).await;

    let err = app
        .services
        .post_commands
        .replace_links(
            &author(),
            ReplacePostLinksCommand {
                post_id,
                kind: LinkKind::Category,
                target_ids: vec![],
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ApplicationError::Forbidden(_)));
}

// Exercises the PostLinkRepository contract against the in-memory store; the
// Postgres adapter gives the same guarantee through its transaction.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn memory_store_readers_see_whole_link_sets() {
    let app = TestApp::new();
    let ids = seed_categories(&app, &["A", "B", "C"]).await;
    let (a, b, c) = (ids[0], ids[1], ids[2]);
    let post_id = seed_post(&app, vec![a, b]).await;

    let done = Arc::new(AtomicBool::new(false));
    let mut readers = Vec::new();
    for _ in 0..4 {
        let store = app.store.clone();
        let done = Arc::clone(&done);
        readers.push(tokio::spawn(async move {
            let mut observations = 0usize;
            loop {
                let seen = store
                    .links_of(PostId(post_id), LinkKind::Category)
                    .await
                    .unwrap();
                assert!(!seen.is_empty(), "reader saw an empty link set");
                assert!(
                    seen == BTreeSet::from([a, b]) || seen == BTreeSet::from([b, c]),
                    "reader saw a partial set {seen:?}"
                );
                observations += 1;
                if done.load(Ordering::SeqCst) {
                    break;
                }
                tokio::task::yield_now().await;
            }
            observations
        }));
    }

    for round in 0..200 {
        let next = if round % 2 == 0 { vec![b, c] } else { vec![a, b] };
        replace(&app, post_id, LinkKind::Category, next)
            .await
            .unwrap();
        tokio::task::yield_now().await;
    }
    done.store(true, Ordering::SeqCst);

    for reader in readers {
        assert!(reader.await.unwrap() > 0);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_replacements_leave_one_whole_set() {
    let app = TestApp::new();
    let ids = seed_categories(&app, &["A", "B", "C", "D"]).await;
    let post_id = seed_post(&app, vec![ids[0]]).await;
    let candidates = [
        vec![ids[0], ids[1]],
        vec![ids[2], ids[3]],
        vec![ids[1], ids[2]],
        vec![ids[3]],
    ];

    let mut writers = Vec::new();
    for set in candidates.clone() {
        let services = Arc::clone(&app.services);
        writers.push(tokio::spawn(async move {
            services
                .post_commands
                .replace_links(
                    &admin(),
                    ReplacePostLinksCommand {
                        post_id,
                        kind: LinkKind::Category,
                        target_ids: set,
                    },
                )
                .await
        }));
    }
    for writer in writers {
        writer.await.unwrap().unwrap();
    }

    let stored = app
        .store
        .links_of(PostId(post_id), LinkKind::Category)
        .await
        .unwrap();
    assert!(
        candidates
            .iter()
            .any(|set| set.iter().copied().collect::<BTreeSet<_>>() == stored),
        "links were merged across writers: {stored:?}"
    );
}
