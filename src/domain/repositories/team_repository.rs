use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::team::Team;

/// Read-side contract for teams.
///
/// `get` returns the team hydrated with its members, delivered sorted by
/// `(username, user_id)`, and fails with `NOT_FOUND` for unknown names.
/// Writes go through the transactional unit of work.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn get(&self, team_name: &str) -> DomainResult<Team>;

    async fn count(&self) -> DomainResult<i64>;
}
