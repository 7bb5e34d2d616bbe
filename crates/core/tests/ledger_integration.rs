//! Interaction ledger integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test ledger_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `curator_test`)
//!   `TEST_DB_PASSWORD` (default: `curator_test`)
//!   `TEST_DB_NAME` (default: `curator_test`)

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use curator_common::{AppError, IdGenerator};
use curator_core::services::{FollowingService, InteractionService, TargetRef};
use curator_db::{
    entities::{
        interaction::{RelationKind, TargetKind},
        post, user,
    },
    repositories::{
        CommentRepository, InteractionRepository, LookbookRepository, OutfitRepository,
        PostRepository, UserRepository,
    },
    test_utils::TestDatabase,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

async fn setup() -> (TestDatabase, Arc<DatabaseConnection>) {
    let db = TestDatabase::create_unique().await.expect("create test db");
    curator_db::migrate(db.connection()).await.expect("migrate");
    let conn = Arc::clone(&db.conn);
    (db, conn)
}

fn build_service(conn: &Arc<DatabaseConnection>) -> InteractionService {
    InteractionService::new(
        conn.clone(),
        InteractionRepository::new(conn.clone()),
        UserRepository::new(conn.clone()),
        PostRepository::new(conn.clone()),
        OutfitRepository::new(conn.clone()),
        LookbookRepository::new(conn.clone()),
        CommentRepository::new(conn.clone()),
    )
}

async fn seed_user(conn: &DatabaseConnection, username: &str) -> user::Model {
    user::ActiveModel {
        id: Set(IdGenerator::new().generate()),
        username: Set(username.to_string()),
        username_lower: Set(username.to_lowercase()),
        token: Set(Some(format!("token-{username}"))),
        ..Default::default()
    }
    .insert(conn)
    .await
    .expect("seed user")
}

async fn seed_post(conn: &DatabaseConnection, user_id: &str) -> post::Model {
    post::ActiveModel {
        id: Set(IdGenerator::new().generate()),
        user_id: Set(user_id.to_string()),
        caption: Set("integration test post".to_string()),
        tags: Set(serde_json::json!([])),
        privacy: Set(post::Privacy::Public),
        ..Default::default()
    }
    .insert(conn)
    .await
    .expect("seed post")
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_toggle_creates_then_removes_edge() {
    let (db, conn) = setup().await;
    let service = build_service(&conn);

    let alice = seed_user(&conn, "alice").await;
    let bob = seed_user(&conn, "bob").await;
    let post = seed_post(&conn, &bob.id).await;
    let target = TargetRef::new(TargetKind::Post, &post.id);

    let first = service
        .toggle(&alice.id, &target, RelationKind::Like, None)
        .await
        .unwrap();
    assert!(first.created);
    assert_eq!(first.count, 1);
    assert!(service
        .is_member(&alice.id, &target, RelationKind::Like)
        .await
        .unwrap());

    let second = service
        .toggle(&alice.id, &target, RelationKind::Like, None)
        .await
        .unwrap();
    assert!(!second.created);
    assert_eq!(second.count, 0);
    assert!(!service
        .is_member(&alice.id, &target, RelationKind::Like)
        .await
        .unwrap());

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_self_like_is_allowed() {
    let (db, conn) = setup().await;
    let service = build_service(&conn);

    let alice = seed_user(&conn, "alice").await;
    let post = seed_post(&conn, &alice.id).await;
    let target = TargetRef::new(TargetKind::Post, &post.id);

    let outcome = service
        .toggle(&alice.id, &target, RelationKind::Like, None)
        .await
        .unwrap();
    assert!(outcome.created);
    assert_eq!(outcome.count, 1);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_save_carries_collection_name() {
    let (db, conn) = setup().await;
    let service = build_service(&conn);

    let alice = seed_user(&conn, "alice").await;
    let bob = seed_user(&conn, "bob").await;
    let post = seed_post(&conn, &bob.id).await;
    let target = TargetRef::new(TargetKind::Post, &post.id);

    let outcome = service
        .toggle(&alice.id, &target, RelationKind::Save, Some("wishlist"))
        .await
        .unwrap();
    assert!(outcome.created);
    assert_eq!(outcome.count, 1);

    let repo = InteractionRepository::new(conn.clone());
    let edge = repo
        .find_edge(&alice.id, TargetKind::Post, &post.id, RelationKind::Save)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(edge.collection_name.as_deref(), Some("wishlist"));

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_counter_never_goes_negative() {
    let (db, conn) = setup().await;
    let service = build_service(&conn);

    let alice = seed_user(&conn, "alice").await;
    let bob = seed_user(&conn, "bob").await;
    let post = seed_post(&conn, &bob.id).await;
    let target = TargetRef::new(TargetKind::Post, &post.id);

    // Create the edge, then zero the counter out from under it
    service
        .toggle(&alice.id, &target, RelationKind::Like, None)
        .await
        .unwrap();
    let repo = InteractionRepository::new(conn.clone());
    repo.overwrite_counter_in(conn.as_ref(), TargetKind::Post, &post.id, RelationKind::Like, 0)
        .await
        .unwrap();

    // Removing the edge must floor at zero, not underflow
    let outcome = service
        .toggle(&alice.id, &target, RelationKind::Like, None)
        .await
        .unwrap();
    assert!(!outcome.created);
    assert_eq!(outcome.count, 0);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_reconcile_repairs_drift() {
    let (db, conn) = setup().await;
    let service = build_service(&conn);

    let alice = seed_user(&conn, "alice").await;
    let bob = seed_user(&conn, "bob").await;
    let carol = seed_user(&conn, "carol").await;
    let post = seed_post(&conn, &bob.id).await;
    let target = TargetRef::new(TargetKind::Post, &post.id);

    service
        .toggle(&alice.id, &target, RelationKind::Like, None)
        .await
        .unwrap();
    service
        .toggle(&carol.id, &target, RelationKind::Like, None)
        .await
        .unwrap();

    // Inject drift
    let repo = InteractionRepository::new(conn.clone());
    repo.overwrite_counter_in(conn.as_ref(), TargetKind::Post, &post.id, RelationKind::Like, 99)
        .await
        .unwrap();

    let (stored, actual) = service
        .reconcile(&target, RelationKind::Like)
        .await
        .unwrap();
    assert_eq!(stored, 99);
    assert_eq!(actual, 2);
    assert_eq!(
        service.count_for(&target, RelationKind::Like).await.unwrap(),
        2
    );

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_follow_updates_both_user_counters() {
    let (db, conn) = setup().await;
    let service = build_service(&conn);
    let following = FollowingService::new(service);

    let alice = seed_user(&conn, "alice").await;
    let bob = seed_user(&conn, "bob").await;

    let followers = following.follow(&alice.id, &bob.id).await.unwrap();
    assert_eq!(followers, 1);

    let users = UserRepository::new(conn.clone());
    let alice_row = users.get_by_id(&alice.id).await.unwrap();
    let bob_row = users.get_by_id(&bob.id).await.unwrap();
    assert_eq!(alice_row.following_count, 1);
    assert_eq!(bob_row.followers_count, 1);

    // Duplicate follow is an error, not an unfollow
    let dup = following.follow(&alice.id, &bob.id).await;
    assert!(dup.is_err());

    let followers = following.unfollow(&alice.id, &bob.id).await.unwrap();
    assert_eq!(followers, 0);

    let alice_row = users.get_by_id(&alice.id).await.unwrap();
    assert_eq!(alice_row.following_count, 0);

    // Unfollowing again is an error
    let again = following.unfollow(&alice.id, &bob.id).await;
    assert!(again.is_err());

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_concurrent_follows_never_unfollow() {
    let (db, conn) = setup().await;

    let alice = seed_user(&conn, "alice").await;
    let bob = seed_user(&conn, "bob").await;

    // Two tasks race the same first follow. Follow is not a toggle:
    // the loser must get the duplicate error, never remove the
    // winner's edge.
    let f1 = FollowingService::new(build_service(&conn));
    let f2 = FollowingService::new(build_service(&conn));
    let (a1, b1) = (alice.id.clone(), bob.id.clone());
    let (a2, b2) = (alice.id.clone(), bob.id.clone());

    let (r1, r2) = tokio::join!(
        tokio::spawn(async move { f1.follow(&a1, &b1).await }),
        tokio::spawn(async move { f2.follow(&a2, &b2).await }),
    );
    let results = [r1.unwrap(), r2.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one follow must win: {results:?}");
    for r in &results {
        if let Err(e) = r {
            assert!(matches!(e, AppError::BadRequest(_)));
        }
    }

    // The edge survives and both counters reflect one follow
    let following = FollowingService::new(build_service(&conn));
    assert!(following.is_following(&alice.id, &bob.id).await.unwrap());

    let users = UserRepository::new(conn.clone());
    assert_eq!(users.get_by_id(&bob.id).await.unwrap().followers_count, 1);
    assert_eq!(users.get_by_id(&alice.id).await.unwrap().following_count, 1);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_concurrent_first_toggles_stay_consistent() {
    let (db, conn) = setup().await;

    let alice = seed_user(&conn, "alice").await;
    let bob = seed_user(&conn, "bob").await;
    let post = seed_post(&conn, &bob.id).await;

    // Two tasks race the same first toggle. Whatever interleaving the
    // database picks, the stored counter must match the live edge count
    // afterwards.
    let s1 = build_service(&conn);
    let s2 = build_service(&conn);
    let t1 = TargetRef::new(TargetKind::Post, &post.id);
    let t2 = TargetRef::new(TargetKind::Post, &post.id);
    let uid1 = alice.id.clone();
    let uid2 = alice.id.clone();

    let (r1, r2) = tokio::join!(
        tokio::spawn(async move { s1.toggle(&uid1, &t1, RelationKind::Like, None).await }),
        tokio::spawn(async move { s2.toggle(&uid2, &t2, RelationKind::Like, None).await }),
    );
    r1.unwrap().unwrap();
    r2.unwrap().unwrap();

    let repo = InteractionRepository::new(conn.clone());
    let edges = repo
        .count_edges(TargetKind::Post, &post.id, RelationKind::Like)
        .await
        .unwrap();
    let stored = repo
        .read_counter_in(conn.as_ref(), TargetKind::Post, &post.id, RelationKind::Like)
        .await
        .unwrap();
    assert_eq!(i64::from(stored), i64::try_from(edges).unwrap());

    db.drop_database().await.unwrap();
}
