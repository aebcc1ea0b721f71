use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::errors::ApiError;
use crate::api::middleware::AuthUser;
use crate::api::AppState;
use crate::domain::pull_request::{NewPullRequest, PullRequest, ReviewerChange};

#[derive(Debug, Serialize, Deserialize)]
pub struct PullRequestDto {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: String,
    pub assigned_reviewers: Vec<String>,
    pub need_more_reviewers: bool,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl From<&PullRequest> for PullRequestDto {
    fn from(pr: &PullRequest) -> Self {
        Self {
            pull_request_id: pr.id.clone(),
            pull_request_name: pr.name.clone(),
            author_id: pr.author_id.clone(),
            status: pr.status.as_str().to_string(),
            assigned_reviewers: pr.assigned_reviewers.clone(),
            need_more_reviewers: pr.need_more_reviewers,
            created_at: pr.created_at,
            merged_at: pr.merged_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePrRequest {
    #[serde(default)]
    pub pull_request_id: String,
    #[serde(default)]
    pub pull_request_name: String,
    #[serde(default)]
    pub author_id: String,
}

/// Create a pull request and auto-assign reviewers
///
/// POST /pullRequest/create
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreatePrRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    auth.require_admin()?;

    if payload.pull_request_id.trim().is_empty()
        || payload.pull_request_name.trim().is_empty()
        || payload.author_id.trim().is_empty()
    {
        return Err(ApiError::bad_request(
            "pull_request_id, pull_request_name and author_id are required",
        ));
    }

    let pr = state
        .pull_requests
        .create_pull_request(NewPullRequest {
            id: payload.pull_request_id,
            name: payload.pull_request_name,
            author_id: payload.author_id,
            created_at: None,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "pr": PullRequestDto::from(&pr) }))))
}

#[derive(Debug, Deserialize)]
pub struct MergePrRequest {
    #[serde(default)]
    pub pull_request_id: String,
}

/// Merge a pull request (idempotent)
///
/// POST /pullRequest/merge
pub async fn merge(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<MergePrRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    auth.require_admin()?;

    if payload.pull_request_id.trim().is_empty() {
        return Err(ApiError::bad_request("pull_request_id is required"));
    }

    let pr = state
        .pull_requests
        .merge_pull_request(&payload.pull_request_id)
        .await?;

    Ok(Json(json!({ "pr": PullRequestDto::from(&pr) })))
}

#[derive(Debug, Deserialize)]
pub struct ReassignRequest {
    #[serde(default)]
    pub pull_request_id: String,
    #[serde(default)]
    pub old_user_id: String,
    /// Legacy field name still accepted from older clients.
    #[serde(default)]
    pub old_reviewer_id: String,
}

/// Replace a reviewer with another member of their team
///
/// POST /pullRequest/reassign
pub async fn reassign(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ReassignRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    auth.require_admin()?;

    let old_user_id = if payload.old_user_id.trim().is_empty() {
        payload.old_reviewer_id
    } else {
        payload.old_user_id
    };

    if payload.pull_request_id.trim().is_empty() || old_user_id.trim().is_empty() {
        return Err(ApiError::bad_request(
            "pull_request_id and old_user_id are required",
        ));
    }

    let (pr, change) = state
        .pull_requests
        .reassign_reviewer(&payload.pull_request_id, &old_user_id)
        .await?;

    let replaced_by = match &change {
        ReviewerChange::Replaced(id) => id.as_str(),
        ReviewerChange::Vacated => "",
    };

    Ok(Json(json!({
        "pr": PullRequestDto::from(&pr),
        "replaced_by": replaced_by,
    })))
}
