use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::api::errors::ApiError;
use crate::api::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

/// Bearer-token authentication extractor.
///
/// Tokens are static, configured via environment. When no tokens are
/// configured, authentication is disabled and every caller acts as admin.
///
/// Usage:
/// ```ignore
/// async fn protected_handler(auth: AuthUser) -> Result<String, ApiError> {
///     auth.require_admin()?;
///     Ok("hello".to_string())
/// }
/// ```
pub struct AuthUser(pub Role);

impl AuthUser {
    pub fn require_admin(&self) -> Result<(), ApiError> {
        match self.0 {
            Role::Admin => Ok(()),
            Role::User => Err(ApiError::forbidden("insufficient permissions")),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth = &state.auth;

        if !auth.enabled() {
            return Ok(AuthUser(Role::Admin));
        }

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("missing token"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("invalid authorization format. Use: Bearer <token>"))?;

        if auth.admin_token.as_deref() == Some(token) {
            return Ok(AuthUser(Role::Admin));
        }

        if auth.user_token.as_deref() == Some(token) {
            return Ok(AuthUser(Role::User));
        }

        Err(ApiError::unauthorized("invalid token"))
    }
}
