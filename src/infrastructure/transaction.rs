use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::repositories::queries;
use crate::domain::errors::DomainResult;
use crate::domain::pull_request::PullRequest;
use crate::domain::repositories::{TransactionManager, UnitOfWork};
use crate::domain::team::Team;
use crate::domain::user::User;

/// Opens real PostgreSQL transactions as units of work.
pub struct PgTransactionManager {
    pool: PgPool,
}

impl PgTransactionManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionManager for PgTransactionManager {
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await.map_err(queries::storage)?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

/// Unit of work backed by a single `sqlx` transaction.
///
/// Dropping the value without committing rolls the transaction back, so a
/// cancelled request can never leave a partial write behind.
struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn get_user(&mut self, user_id: &str) -> DomainResult<User> {
        queries::get_user(&mut self.tx, user_id).await
    }

    async fn get_team(&mut self, team_name: &str) -> DomainResult<Team> {
        queries::get_team(&mut self.tx, team_name).await
    }

    async fn get_pull_request(&mut self, pr_id: &str) -> DomainResult<PullRequest> {
        queries::get_pull_request(&mut self.tx, pr_id).await
    }

    async fn insert_team(&mut self, team: &Team) -> DomainResult<()> {
        queries::insert_team(&mut self.tx, team).await
    }

    async fn upsert_users(&mut self, users: &[User]) -> DomainResult<()> {
        queries::upsert_users(&mut self.tx, users).await
    }

    async fn insert_pull_request(&mut self, pr: &PullRequest) -> DomainResult<()> {
        queries::insert_pull_request(&mut self.tx, pr).await
    }

    async fn update_pull_request(&mut self, pr: &PullRequest) -> DomainResult<()> {
        queries::update_pull_request(&mut self.tx, pr).await
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let this = *self;
        this.tx.commit().await.map_err(queries::storage)
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        let this = *self;
        this.tx.rollback().await.map_err(queries::storage)
    }
}
