use async_trait::async_trait;
use sqlx::PgPool;

use super::queries;
use crate::domain::errors::DomainResult;
use crate::domain::pull_request::PullRequest;
use crate::domain::repositories::PullRequestRepository;

/// PostgreSQL implementation of the pull request read port.
pub struct PostgresPullRequestRepository {
    pool: PgPool,
}

impl PostgresPullRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PullRequestRepository for PostgresPullRequestRepository {
    async fn get_by_id(&self, pr_id: &str) -> DomainResult<PullRequest> {
        let mut conn = self.pool.acquire().await.map_err(queries::storage)?;
        queries::get_pull_request(&mut conn, pr_id).await
    }

    async fn list_by_reviewer(&self, reviewer_id: &str) -> DomainResult<Vec<PullRequest>> {
        let mut conn = self.pool.acquire().await.map_err(queries::storage)?;
        queries::list_pull_requests_by_reviewer(&mut conn, reviewer_id).await
    }

    async fn count(&self) -> DomainResult<i64> {
        let mut conn = self.pool.acquire().await.map_err(queries::storage)?;
        queries::count_pull_requests(&mut conn).await
    }

    async fn count_assignments(&self) -> DomainResult<i64> {
        let mut conn = self.pool.acquire().await.map_err(queries::storage)?;
        queries::count_reviewer_assignments(&mut conn).await
    }
}
