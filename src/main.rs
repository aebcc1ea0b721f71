use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use review_rota::api::{self, AppState};
use review_rota::config::Config;
use review_rota::infrastructure::repositories::{
    PostgresPullRequestRepository, PostgresTeamRepository, PostgresUserRepository,
};
use review_rota::infrastructure::PgTransactionManager;
use review_rota::services::{PullRequestService, StatsService, TeamService, UserService};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = Config::from_env();

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Database connected successfully");

    // Wire persistence adapters and services
    let team_repo = Arc::new(PostgresTeamRepository::new(pool.clone()));
    let user_repo = Arc::new(PostgresUserRepository::new(pool.clone()));
    let pr_repo = Arc::new(PostgresPullRequestRepository::new(pool.clone()));
    let tx_manager = Arc::new(PgTransactionManager::new(pool.clone()));

    let state = AppState {
        teams: Arc::new(TeamService::new(team_repo.clone(), tx_manager.clone())),
        users: Arc::new(UserService::new(user_repo.clone(), pr_repo.clone())),
        pull_requests: Arc::new(PullRequestService::new(tx_manager)),
        stats: Arc::new(StatsService::new(team_repo, user_repo, pr_repo)),
        auth: config.auth.clone(),
    };

    let app = api::router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
