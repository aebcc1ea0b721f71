use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::pull_request::PullRequest;
use crate::domain::team::Team;
use crate::domain::user::User;

/// Opens atomic units of work.
///
/// The handle is threaded explicitly through repository calls rather than
/// hiding a transaction in ambient request context: every operation that
/// must share the transaction takes place on the same `UnitOfWork` value.
#[async_trait]
pub trait TransactionManager: Send + Sync {
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>>;
}

/// Transaction-scoped repository operations.
///
/// Either `commit` makes every write durable or the unit of work is rolled
/// back; dropping an uncommitted handle must roll back. Uniqueness and
/// foreign-key violations surface as domain errors (`TEAM_EXISTS`,
/// `PR_EXISTS`, `NOT_FOUND`) at this boundary.
#[async_trait]
pub trait UnitOfWork: Send {
    async fn get_user(&mut self, user_id: &str) -> DomainResult<User>;

    async fn get_team(&mut self, team_name: &str) -> DomainResult<Team>;

    async fn get_pull_request(&mut self, pr_id: &str) -> DomainResult<PullRequest>;

    /// Inserts the team row. Fails with `TEAM_EXISTS` on a duplicate name.
    async fn insert_team(&mut self, team: &Team) -> DomainResult<()>;

    /// Inserts or updates users by id.
    async fn upsert_users(&mut self, users: &[User]) -> DomainResult<()>;

    /// Inserts the pull request row plus its reviewer assignment rows.
    /// Fails with `PR_EXISTS` on a duplicate id.
    async fn insert_pull_request(&mut self, pr: &PullRequest) -> DomainResult<()>;

    /// Updates the pull request row and replaces its reviewer rows.
    async fn update_pull_request(&mut self, pr: &PullRequest) -> DomainResult<()>;

    async fn commit(self: Box<Self>) -> DomainResult<()>;

    async fn rollback(self: Box<Self>) -> DomainResult<()>;
}
