use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::app::AppServices;
use crate::infrastructure::config::Config;
use crate::infrastructure::db::DbPool;
use crate::infrastructure::storage::UPLOAD_URL_PREFIX;
use crate::{
    controllers::{auth::AuthController, feed::FeedController, health, member::MemberController},
    infrastructure::auth::{auth_middleware, request_id_middleware},
};

/// Room for the JSON part and multipart framing on top of the image itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the application router with every route and layer attached
pub fn build_router(config: &Config, services: &AppServices, pool: Option<Arc<DbPool>>) -> Router {
    let auth_controller = Arc::new(AuthController::new(services.auth.clone()));
    let member_controller = Arc::new(MemberController::new(services.member.clone()));
    let feed_controller = Arc::new(FeedController::new(
        services.feed.clone(),
        services.tag.clone(),
    ));

    // Feed routes (require authentication)
    let feed_routes = Router::new()
        .route(
            "/feed",
            get(FeedController::get_feeds).post(FeedController::post_feed),
        )
        .route("/feed/tags", get(FeedController::find_tags))
        .route(
            "/feed/:feedId",
            get(FeedController::get_feed)
                .patch(FeedController::patch_feed)
                .delete(FeedController::delete_feed),
        )
        .route(
            "/feed/:feedId/likes",
            post(FeedController::do_like).delete(FeedController::cancel_like),
        )
        .with_state(feed_controller)
        .layer(DefaultBodyLimit::max(
            config.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
        ))
        .route_layer(middleware::from_fn_with_state(
            services.auth.clone(),
            auth_middleware,
        ));

    // Member routes (public)
    let member_routes = Router::new()
        .route("/members/signup", post(MemberController::sign_up))
        .with_state(member_controller);

    // Auth routes (public - no auth required)
    let auth_routes = Router::new()
        .route("/auth/login", post(AuthController::login))
        .route("/auth/reissue", post(AuthController::reissue))
        .with_state(auth_controller.clone());

    // Logout requires auth
    let auth_protected_routes = Router::new()
        .route("/auth/logout", post(AuthController::logout))
        .with_state(auth_controller)
        .route_layer(middleware::from_fn_with_state(
            services.auth.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(pool)
        .merge(feed_routes)
        .merge(member_routes)
        .merge(auth_routes)
        .merge(auth_protected_routes)
        .nest_service(UPLOAD_URL_PREFIX, ServeDir::new(&config.upload_dir))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured address and serve until the process stops
pub async fn start_http_server(config: &Config, app: Router) -> anyhow::Result<()> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
