use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::json;

use crate::api::errors::ApiError;
use crate::api::middleware::AuthUser;
use crate::api::AppState;

#[derive(Debug, Serialize)]
pub struct StatsDto {
    pub teams: i64,
    pub users: i64,
    pub pull_requests: i64,
    pub assignments: i64,
}

/// Aggregate counters across the whole system
///
/// GET /stats
pub async fn get_stats(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let stats = state.stats.get_stats().await?;

    Ok(Json(json!({
        "stats": StatsDto {
            teams: stats.teams,
            users: stats.users,
            pull_requests: stats.pull_requests,
            assignments: stats.assignments,
        }
    })))
}
