//! Agora server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use agora_api::{AppState, identity_middleware, router as api_router};
use agora_common::{Config, LocalStorage};
use agora_core::{
    CommentService, CommunityService, LikeService, MediaService, PostService, StorageService,
    SubscriptionService, TopicService, UserService,
};
use agora_db::repositories::{
    CommentRepository, CommunityRepository, LikeRepository, PostRepository,
    SubscriptionRepository, TopicRepository, UserRepository,
};
use axum::{Router, extract::DefaultBodyLimit, middleware};
use sea_orm::DatabaseConnection;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On non-Unix targets only Ctrl+C is observed.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
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

/// Wire repositories and services over one connection pool.
fn build_state(db: &Arc<DatabaseConnection>, storage: StorageService) -> AppState {
    let user_repo = UserRepository::new(Arc::clone(db));
    let post_repo = PostRepository::new(Arc::clone(db));
    let comment_repo = CommentRepository::new(Arc::clone(db));
    let like_repo = LikeRepository::new(Arc::clone(db));
    let subscription_repo = SubscriptionRepository::new(Arc::clone(db));
    let community_repo = CommunityRepository::new(Arc::clone(db));
    let topic_repo = TopicRepository::new(Arc::clone(db));

    AppState {
        user_service: UserService::new(user_repo.clone()),
        post_service: PostService::new(
            post_repo.clone(),
            user_repo.clone(),
            community_repo.clone(),
            topic_repo.clone(),
            MediaService::new(storage),
        ),
        comment_service: CommentService::new(comment_repo, post_repo.clone(), user_repo.clone()),
        like_service: LikeService::new(like_repo, post_repo, user_repo.clone()),
        subscription_service: SubscriptionService::new(
            subscription_repo,
            community_repo.clone(),
            user_repo.clone(),
        ),
        community_service: CommunityService::new(community_repo, user_repo.clone()),
        topic_service: TopicService::new(topic_repo, user_repo),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agora=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting agora server...");

    let config = Config::load()?;

    let db = agora_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    agora_db::migrate(&db).await?;
    info!("Migrations completed");

    tokio::fs::create_dir_all(&config.storage.base_path).await?;
    let storage: StorageService = Arc::new(LocalStorage::new(
        config.storage.base_path.clone(),
        config.storage.public_url.clone(),
    ));

    let db = Arc::new(db);
    let state = build_state(&db, storage);

    let app = Router::new()
        .merge(api_router())
        .layer(middleware::from_fn(identity_middleware))
        .with_state(state)
        .nest_service(
            &config.storage.public_url,
            ServeDir::new(&config.storage.base_path),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(DefaultBodyLimit::max(config.server.max_body_bytes)),
        );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
