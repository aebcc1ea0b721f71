use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Closed error taxonomy for the reviewer assignment domain.
///
/// Repositories translate storage-level constraint violations into these
/// variants at the boundary; services propagate them unchanged. `Storage`
/// carries any other infrastructure failure and must be treated by callers
/// as an internal error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("team {0} already exists")]
    TeamExists(String),

    #[error("pull request {0} already exists")]
    PullRequestExists(String),

    #[error("pull request {0} is already merged")]
    PullRequestMerged(String),

    #[error("user {user_id} is not assigned to pull request {pr_id}")]
    NotAssigned { user_id: String, pr_id: String },

    #[error("no active candidates found in team {0}")]
    NoCandidate(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Machine-readable error code exposed on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::TeamExists(_) => "TEAM_EXISTS",
            DomainError::PullRequestExists(_) => "PR_EXISTS",
            DomainError::PullRequestMerged(_) => "PR_MERGED",
            DomainError::NotAssigned { .. } => "NOT_ASSIGNED",
            DomainError::NoCandidate(_) => "NO_CANDIDATE",
            DomainError::NotFound(_) => "NOT_FOUND",
            DomainError::Required { .. } => "BAD_REQUEST",
            DomainError::Storage(_) => "INTERNAL_ERROR",
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        DomainError::NotFound(resource.into())
    }
}
