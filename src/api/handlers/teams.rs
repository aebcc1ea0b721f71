use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::errors::ApiError;
use crate::api::middleware::AuthUser;
use crate::api::AppState;
use crate::domain::team::Team;
use crate::domain::user::NewMember;

#[derive(Debug, Serialize, Deserialize)]
pub struct TeamMemberDto {
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TeamDto {
    pub team_name: String,
    #[serde(default)]
    pub members: Vec<TeamMemberDto>,
}

impl From<&Team> for TeamDto {
    fn from(team: &Team) -> Self {
        Self {
            team_name: team.name.clone(),
            members: team
                .members_sorted()
                .into_iter()
                .map(|member| TeamMemberDto {
                    user_id: member.id.clone(),
                    username: member.username.clone(),
                    is_active: member.is_active,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GetTeamParams {
    #[serde(default)]
    pub team_name: String,
}

/// Create a team with its initial members
///
/// POST /team/add
pub async fn create_team(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<TeamDto>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    auth.require_admin()?;

    if payload.team_name.trim().is_empty() {
        return Err(ApiError::bad_request("team_name is required"));
    }

    let members = payload
        .members
        .into_iter()
        .map(|member| NewMember {
            id: member.user_id,
            username: member.username,
            is_active: member.is_active,
        })
        .collect();

    let team = state.teams.create_team(&payload.team_name, members).await?;

    Ok((StatusCode::CREATED, Json(json!({ "team": TeamDto::from(&team) }))))
}

/// Get a team by name
///
/// GET /team/get?team_name=
pub async fn get_team(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<GetTeamParams>,
) -> Result<Json<TeamDto>, ApiError> {
    if params.team_name.trim().is_empty() {
        return Err(ApiError::bad_request("team_name is required"));
    }

    let team = state.teams.get_team(&params.team_name).await?;

    Ok(Json(TeamDto::from(&team)))
}
