use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::pull_request::PullRequest;

/// Read-side contract for pull requests.
#[async_trait]
pub trait PullRequestRepository: Send + Sync {
    /// Fails with `NOT_FOUND` for unknown ids.
    async fn get_by_id(&self, pr_id: &str) -> DomainResult<PullRequest>;

    /// All pull requests where the user is an assigned reviewer, newest
    /// first (ties broken by reviewer id at the storage boundary).
    async fn list_by_reviewer(&self, reviewer_id: &str) -> DomainResult<Vec<PullRequest>>;

    async fn count(&self) -> DomainResult<i64>;

    /// Total reviewer assignment rows across all pull requests.
    async fn count_assignments(&self) -> DomainResult<i64>;
}
