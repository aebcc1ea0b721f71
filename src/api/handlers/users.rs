use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::errors::ApiError;
use crate::api::middleware::AuthUser;
use crate::api::AppState;
use crate::domain::pull_request::PullRequest;
use crate::domain::user::User;

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            username: user.username.clone(),
            team_name: user.team_name.clone(),
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PullRequestShortDto {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: String,
}

impl From<&PullRequest> for PullRequestShortDto {
    fn from(pr: &PullRequest) -> Self {
        Self {
            pull_request_id: pr.id.clone(),
            pull_request_name: pr.name.clone(),
            author_id: pr.author_id.clone(),
            status: pr.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetActivityRequest {
    #[serde(default)]
    pub user_id: String,
    pub is_active: Option<bool>,
}

/// Toggle a user's activity flag
///
/// POST /users/setIsActive
pub async fn set_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SetActivityRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    auth.require_admin()?;

    if payload.user_id.trim().is_empty() {
        return Err(ApiError::bad_request("user_id is required"));
    }

    let is_active = payload
        .is_active
        .ok_or_else(|| ApiError::bad_request("is_active is required"))?;

    let user = state.users.set_activity(&payload.user_id, is_active).await?;

    Ok(Json(json!({ "user": UserDto::from(&user) })))
}

#[derive(Debug, Deserialize)]
pub struct GetReviewParams {
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct ListPullRequestsResponse {
    pub user_id: String,
    pub pull_requests: Vec<PullRequestShortDto>,
}

/// List pull requests the user reviews, newest first
///
/// GET /users/getReview?user_id=
pub async fn get_reviewer_assignments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<GetReviewParams>,
) -> Result<Json<ListPullRequestsResponse>, ApiError> {
    if params.user_id.trim().is_empty() {
        return Err(ApiError::bad_request("user_id is required"));
    }

    let prs = state.users.get_reviewer_assignments(&params.user_id).await?;

    Ok(Json(ListPullRequestsResponse {
        user_id: params.user_id.trim().to_string(),
        pull_requests: prs.iter().map(PullRequestShortDto::from).collect(),
    }))
}
