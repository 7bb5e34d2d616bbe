//! Curator server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use curator_api::{middleware::AppState, router as api_router};
use curator_common::Config;
use curator_core::{
    CommentService, FollowingService, InteractionService, LookbookService, NotificationService,
    OutfitService, PostService, UserService,
};
use curator_db::repositories::{
    CommentRepository, InteractionRepository, LookbookRepository, NotificationRepository,
    OutfitRepository, PostRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "curator=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting curator server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database and run migrations
    let db = curator_db::init(&config.database).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    curator_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);

    // Initialize repositories
    let user_repo = UserRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let outfit_repo = OutfitRepository::new(Arc::clone(&db));
    let lookbook_repo = LookbookRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let interaction_repo = InteractionRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));

    // Initialize services
    let interaction_service = InteractionService::new(
        Arc::clone(&db),
        interaction_repo.clone(),
        user_repo.clone(),
        post_repo.clone(),
        outfit_repo.clone(),
        lookbook_repo.clone(),
        comment_repo.clone(),
    );

    let state = AppState {
        user_service: UserService::new(user_repo),
        post_service: PostService::new(
            post_repo.clone(),
            interaction_repo,
            config.server.url.clone(),
        ),
        outfit_service: OutfitService::new(outfit_repo),
        lookbook_service: LookbookService::new(lookbook_repo),
        comment_service: CommentService::new(Arc::clone(&db), comment_repo, post_repo),
        following_service: FollowingService::new(interaction_service.clone()),
        interaction_service,
        notification_service: NotificationService::new(notification_repo),
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            curator_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
