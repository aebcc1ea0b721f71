use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::repositories::{PullRequestRepository, TeamRepository, UserRepository};

/// On-demand read model; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub teams: i64,
    pub users: i64,
    pub pull_requests: i64,
    pub assignments: i64,
}

pub struct StatsService {
    team_repo: Arc<dyn TeamRepository>,
    user_repo: Arc<dyn UserRepository>,
    pr_repo: Arc<dyn PullRequestRepository>,
}

impl StatsService {
    pub fn new(
        team_repo: Arc<dyn TeamRepository>,
        user_repo: Arc<dyn UserRepository>,
        pr_repo: Arc<dyn PullRequestRepository>,
    ) -> Self {
        Self {
            team_repo,
            user_repo,
            pr_repo,
        }
    }

    /// Aggregates the four counts; any failing count aborts the whole call.
    pub async fn get_stats(&self) -> DomainResult<Stats> {
        let teams = self.team_repo.count().await?;
        let users = self.user_repo.count().await?;
        let pull_requests = self.pr_repo.count().await?;
        let assignments = self.pr_repo.count_assignments().await?;

        Ok(Stats {
            teams,
            users,
            pull_requests,
            assignments,
        })
    }
}
