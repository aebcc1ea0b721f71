//! In-memory implementations of the persistence ports.
//!
//! These back the service and API tests without a database. Writes made
//! through a unit of work hit shared state immediately; `rollback` restores
//! the snapshot taken at `begin`, so aborted flows leave no partial rows,
//! mirroring the transactional guarantees of the real store.

// Not every test binary touches every helper.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use review_rota::domain::errors::{DomainError, DomainResult};
use review_rota::domain::pull_request::PullRequest;
use review_rota::domain::repositories::{
    PullRequestRepository, TeamRepository, TransactionManager, UnitOfWork, UserRepository,
};
use review_rota::domain::team::Team;
use review_rota::domain::user::User;

#[derive(Debug, Clone, Default)]
struct StoreState {
    teams: BTreeMap<String, Team>,
    users: BTreeMap<String, User>,
    pull_requests: BTreeMap<String, PullRequest>,
}

impl StoreState {
    fn hydrate_team(&self, team_name: &str) -> DomainResult<Team> {
        let mut team = self
            .teams
            .get(team_name)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("team {team_name}")))?;

        for user in self.users.values() {
            if user.team_name == team_name {
                team.upsert_member(user.clone());
            }
        }

        Ok(team)
    }

    fn get_user(&self, user_id: &str) -> DomainResult<User> {
        self.users
            .get(user_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("user {user_id}")))
    }

    fn get_pull_request(&self, pr_id: &str) -> DomainResult<PullRequest> {
        self.pull_requests
            .get(pr_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("pull request {pr_id}")))
    }

    fn insert_team(&mut self, team: &Team) -> DomainResult<()> {
        if self.teams.contains_key(&team.name) {
            return Err(DomainError::TeamExists(team.name.clone()));
        }

        // Store the bare row; members are hydrated from the users map.
        let row = Team::new(team.name.clone(), team.created_at, team.updated_at);
        self.teams.insert(team.name.clone(), row);
        Ok(())
    }

    fn upsert_users(&mut self, users: &[User]) -> DomainResult<()> {
        for user in users {
            if !self.teams.contains_key(&user.team_name) {
                return Err(DomainError::not_found(format!("team {}", user.team_name)));
            }

            self.users.insert(user.id.clone(), user.clone());
        }

        Ok(())
    }

    fn insert_pull_request(&mut self, pr: &PullRequest) -> DomainResult<()> {
        if self.pull_requests.contains_key(&pr.id) {
            return Err(DomainError::PullRequestExists(pr.id.clone()));
        }

        if !self.users.contains_key(&pr.author_id) {
            return Err(DomainError::not_found(format!("user {}", pr.author_id)));
        }

        for reviewer in &pr.assigned_reviewers {
            if !self.users.contains_key(reviewer) {
                return Err(DomainError::not_found(format!("user {reviewer}")));
            }
        }

        self.pull_requests.insert(pr.id.clone(), pr.clone());
        Ok(())
    }

    fn update_pull_request(&mut self, pr: &PullRequest) -> DomainResult<()> {
        if !self.pull_requests.contains_key(&pr.id) {
            return Err(DomainError::not_found(format!("pull request {}", pr.id)));
        }

        self.pull_requests.insert(pr.id.clone(), pr.clone());
        Ok(())
    }
}

/// Shared in-memory store. Cloning shares the underlying state.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().expect("store mutex poisoned")
    }

    pub fn pull_request(&self, pr_id: &str) -> Option<PullRequest> {
        self.lock().pull_requests.get(pr_id).cloned()
    }

    pub fn user(&self, user_id: &str) -> Option<User> {
        self.lock().users.get(user_id).cloned()
    }

    pub fn team_names(&self) -> Vec<String> {
        self.lock().teams.keys().cloned().collect()
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }
}

struct InMemoryUnitOfWork {
    state: Arc<Mutex<StoreState>>,
    snapshot: StoreState,
}

#[async_trait]
impl TransactionManager for InMemoryStore {
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        let snapshot = self.lock().clone();

        Ok(Box::new(InMemoryUnitOfWork {
            state: Arc::clone(&self.state),
            snapshot,
        }))
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn get_user(&mut self, user_id: &str) -> DomainResult<User> {
        self.state.lock().expect("store mutex poisoned").get_user(user_id)
    }

    async fn get_team(&mut self, team_name: &str) -> DomainResult<Team> {
        self.state
            .lock()
            .expect("store mutex poisoned")
            .hydrate_team(team_name)
    }

    async fn get_pull_request(&mut self, pr_id: &str) -> DomainResult<PullRequest> {
        self.state
            .lock()
            .expect("store mutex poisoned")
            .get_pull_request(pr_id)
    }

    async fn insert_team(&mut self, team: &Team) -> DomainResult<()> {
        self.state.lock().expect("store mutex poisoned").insert_team(team)
    }

    async fn upsert_users(&mut self, users: &[User]) -> DomainResult<()> {
        self.state
            .lock()
            .expect("store mutex poisoned")
            .upsert_users(users)
    }

    async fn insert_pull_request(&mut self, pr: &PullRequest) -> DomainResult<()> {
        self.state
            .lock()
            .expect("store mutex poisoned")
            .insert_pull_request(pr)
    }

    async fn update_pull_request(&mut self, pr: &PullRequest) -> DomainResult<()> {
        self.state
            .lock()
            .expect("store mutex poisoned")
            .update_pull_request(pr)
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        *self.state.lock().expect("store mutex poisoned") = self.snapshot;
        Ok(())
    }
}

#[async_trait]
impl TeamRepository for InMemoryStore {
    async fn get(&self, team_name: &str) -> DomainResult<Team> {
        self.lock().hydrate_team(team_name)
    }

    async fn count(&self) -> DomainResult<i64> {
        Ok(self.lock().teams.len() as i64)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn get_by_id(&self, user_id: &str) -> DomainResult<User> {
        self.lock().get_user(user_id)
    }

    async fn set_activity(&self, user_id: &str, is_active: bool) -> DomainResult<User> {
        let mut state = self.lock();

        let user = state
            .users
            .get_mut(user_id)
            .ok_or_else(|| DomainError::not_found(format!("user {user_id}")))?;

        user.set_activity(is_active, chrono::Utc::now());
        Ok(user.clone())
    }

    async fn count(&self) -> DomainResult<i64> {
        Ok(self.lock().users.len() as i64)
    }
}

#[async_trait]
impl PullRequestRepository for InMemoryStore {
    async fn get_by_id(&self, pr_id: &str) -> DomainResult<PullRequest> {
        self.lock().get_pull_request(pr_id)
    }

    async fn list_by_reviewer(&self, reviewer_id: &str) -> DomainResult<Vec<PullRequest>> {
        let mut prs: Vec<PullRequest> = self
            .lock()
            .pull_requests
            .values()
            .filter(|pr| pr.has_reviewer(reviewer_id))
            .cloned()
            .collect();

        // Newest first; creation-time ties fall back to pull request id,
        // matching the SQL adapter.
        prs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(prs)
    }

    async fn count(&self) -> DomainResult<i64> {
        Ok(self.lock().pull_requests.len() as i64)
    }

    async fn count_assignments(&self) -> DomainResult<i64> {
        Ok(self
            .lock()
            .pull_requests
            .values()
            .map(|pr| pr.assigned_reviewers.len() as i64)
            .sum())
    }
}
