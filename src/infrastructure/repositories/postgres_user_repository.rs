use async_trait::async_trait;
use sqlx::PgPool;

use super::queries;
use crate::domain::errors::DomainResult;
use crate::domain::repositories::UserRepository;
use crate::domain::user::User;

/// PostgreSQL implementation of the user port.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get_by_id(&self, user_id: &str) -> DomainResult<User> {
        let mut conn = self.pool.acquire().await.map_err(queries::storage)?;
        queries::get_user(&mut conn, user_id).await
    }

    async fn set_activity(&self, user_id: &str, is_active: bool) -> DomainResult<User> {
        let mut conn = self.pool.acquire().await.map_err(queries::storage)?;
        queries::set_user_activity(&mut conn, user_id, is_active).await
    }

    async fn count(&self) -> DomainResult<i64> {
        let mut conn = self.pool.acquire().await.map_err(queries::storage)?;
        queries::count_users(&mut conn).await
    }
}
