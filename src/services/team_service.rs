use std::sync::Arc;

use chrono::Utc;

use crate::domain::errors::DomainResult;
use crate::domain::repositories::{TeamRepository, TransactionManager, UnitOfWork};
use crate::domain::team::Team;
use crate::domain::user::{NewMember, User};
use crate::domain::validation::require_str;

pub struct TeamService {
    team_repo: Arc<dyn TeamRepository>,
    tx_manager: Arc<dyn TransactionManager>,
}

impl TeamService {
    pub fn new(team_repo: Arc<dyn TeamRepository>, tx_manager: Arc<dyn TransactionManager>) -> Self {
        Self {
            team_repo,
            tx_manager,
        }
    }

    /// Creates a team together with its initial members in one transaction.
    ///
    /// Existence is not pre-checked; a duplicate name surfaces as
    /// `TEAM_EXISTS` from the store's unique constraint, which avoids a
    /// check-then-act race between concurrent creators.
    pub async fn create_team(&self, name: &str, members: Vec<NewMember>) -> DomainResult<Team> {
        let name = require_str("team_name", name)?;

        let now = Utc::now();
        let mut team = Team::new(name.clone(), now, now);
        let added = team.add_members(Self::sanitize_members(&name, members));

        let mut uow = self.tx_manager.begin().await?;
        let result = Self::create_in_tx(uow.as_mut(), &team, &added).await;

        match result {
            Ok(()) => {
                uow.commit().await?;
                Ok(team)
            }
            Err(err) => {
                tracing::warn!(team_name = %name, error = %err, "failed to create team");
                if let Err(rb_err) = uow.rollback().await {
                    tracing::error!(error = %rb_err, "transaction rollback failed");
                }
                Err(err)
            }
        }
    }

    pub async fn get_team(&self, name: &str) -> DomainResult<Team> {
        let name = require_str("team_name", name)?;

        self.team_repo.get(&name).await
    }

    async fn create_in_tx(uow: &mut dyn UnitOfWork, team: &Team, members: &[User]) -> DomainResult<()> {
        uow.insert_team(team).await?;

        if !members.is_empty() {
            uow.upsert_users(members).await?;
        }

        Ok(())
    }

    /// Drops members with blank ids or usernames and trims the rest.
    /// Timestamps are stamped from a single `now` so a batch shares one
    /// creation instant.
    fn sanitize_members(team_name: &str, members: Vec<NewMember>) -> Vec<User> {
        let now = Utc::now();

        members
            .into_iter()
            .filter_map(|member| {
                let id = member.id.trim();
                let username = member.username.trim();

                if id.is_empty() || username.is_empty() {
                    return None;
                }

                Some(User::new(
                    id,
                    username,
                    team_name,
                    member.is_active,
                    Some(now),
                    Some(now),
                ))
            })
            .collect()
    }
}
