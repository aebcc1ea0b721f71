use async_trait::async_trait;
use sqlx::PgPool;

use super::queries;
use crate::domain::errors::DomainResult;
use crate::domain::repositories::TeamRepository;
use crate::domain::team::Team;

/// PostgreSQL implementation of the team read port.
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn get(&self, team_name: &str) -> DomainResult<Team> {
        let mut conn = self.pool.acquire().await.map_err(queries::storage)?;
        queries::get_team(&mut conn, team_name).await
    }

    async fn count(&self) -> DomainResult<i64> {
        let mut conn = self.pool.acquire().await.map_err(queries::storage)?;
        queries::count_teams(&mut conn).await
    }
}
