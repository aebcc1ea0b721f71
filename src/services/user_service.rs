use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::pull_request::PullRequest;
use crate::domain::repositories::{PullRequestRepository, UserRepository};
use crate::domain::user::User;
use crate::domain::validation::require_str;

pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    pr_repo: Arc<dyn PullRequestRepository>,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>, pr_repo: Arc<dyn PullRequestRepository>) -> Self {
        Self { user_repo, pr_repo }
    }

    pub async fn set_activity(&self, user_id: &str, is_active: bool) -> DomainResult<User> {
        let user_id = require_str("user_id", user_id)?;

        let user = self.user_repo.set_activity(&user_id, is_active).await?;

        tracing::debug!(user_id = %user.id, is_active, "updated user activity");
        Ok(user)
    }

    /// Pull requests where the user is an assigned reviewer, newest first.
    /// The user must exist even if they have no assignments.
    pub async fn get_reviewer_assignments(&self, user_id: &str) -> DomainResult<Vec<PullRequest>> {
        let user_id = require_str("user_id", user_id)?;

        self.user_repo.get_by_id(&user_id).await?;

        self.pr_repo.list_by_reviewer(&user_id).await
    }
}
