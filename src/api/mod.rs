// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AuthConfig;
use crate::services::{PullRequestService, StatsService, TeamService, UserService};

/// Shared handler state: the application services plus auth configuration.
#[derive(Clone)]
pub struct AppState {
    pub teams: Arc<TeamService>,
    pub users: Arc<UserService>,
    pub pull_requests: Arc<PullRequestService>,
    pub stats: Arc<StatsService>,
    pub auth: AuthConfig,
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))
        // Team routes
        .route("/team/add", post(handlers::teams::create_team))
        .route("/team/get", get(handlers::teams::get_team))
        // User routes
        .route("/users/setIsActive", post(handlers::users::set_activity))
        .route("/users/getReview", get(handlers::users::get_reviewer_assignments))
        // Pull request routes
        .route("/pullRequest/create", post(handlers::pull_requests::create))
        .route("/pullRequest/merge", post(handlers::pull_requests::merge))
        .route("/pullRequest/reassign", post(handlers::pull_requests::reassign))
        // Stats
        .route("/stats", get(handlers::stats::get_stats))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}
