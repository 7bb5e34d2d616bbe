//! API integration tests.
//!
//! These tests exercise the router against mock databases.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use curator_api::{middleware::AppState, router as api_router};
use curator_core::{
    CommentService, FollowingService, InteractionService, LookbookService, NotificationService,
    OutfitService, PostService, UserService,
};
use curator_db::repositories::{
    CommentRepository, InteractionRepository, LookbookRepository, NotificationRepository,
    OutfitRepository, PostRepository, UserRepository,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::sync::Arc;
use tower::ServiceExt;

fn create_mock_db() -> Arc<DatabaseConnection> {
    Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
}

fn create_mock_db_with_empty_results(queries: usize) -> Arc<DatabaseConnection> {
    let mut mock = MockDatabase::new(DatabaseBackend::Postgres);
    for _ in 0..queries {
        mock =
            mock.append_query_results([Vec::<curator_db::entities::user::Model>::new()]);
    }
    Arc::new(mock.into_connection())
}

fn create_test_state(user_db: Arc<DatabaseConnection>) -> AppState {
    let db = create_mock_db();

    let user_repo = UserRepository::new(user_db);
    let post_repo = PostRepository::new(Arc::clone(&db));
    let outfit_repo = OutfitRepository::new(Arc::clone(&db));
    let lookbook_repo = LookbookRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let interaction_repo = InteractionRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));

    let interaction_service = InteractionService::new(
        Arc::clone(&db),
        interaction_repo.clone(),
        user_repo.clone(),
        post_repo.clone(),
        outfit_repo.clone(),
        lookbook_repo.clone(),
        comment_repo.clone(),
    );

    AppState {
        user_service: UserService::new(user_repo),
        post_service: PostService::new(
            post_repo.clone(),
            interaction_repo,
            "https://curator.example".to_string(),
        ),
        outfit_service: OutfitService::new(outfit_repo),
        lookbook_service: LookbookService::new(lookbook_repo),
        comment_service: CommentService::new(Arc::clone(&db), comment_repo, post_repo),
        following_service: FollowingService::new(interaction_service.clone()),
        interaction_service,
        notification_service: NotificationService::new(notification_repo),
    }
}

fn create_test_app(state: AppState) -> Router {
    Router::new().merge(api_router()).with_state(state)
}

#[tokio::test]
async fn test_like_requires_auth() {
    let app = create_test_app(create_test_state(create_mock_db()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/posts/post1/like")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_feed_requires_auth() {
    let app = create_test_app(create_test_state(create_mock_db()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/posts/feed")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_follow_requires_auth() {
    let app = create_test_app(create_test_state(create_mock_db()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users/user2/follow")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_unknown_user_is_not_found() {
    let app = create_test_app(create_test_state(create_mock_db_with_empty_results(2)));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/users/ghost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = create_test_app(create_test_state(create_mock_db()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reconcile_requires_auth() {
    let app = create_test_app(create_test_state(create_mock_db()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/counters/reconcile")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"target_kind":"post","target_id":"p1","kind":"like"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
