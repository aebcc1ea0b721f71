use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::pull_request::{NewPullRequest, PrStatus, PullRequest, ReviewerChange};
use crate::domain::repositories::{TransactionManager, UnitOfWork};
use crate::domain::team::Team;
use crate::domain::user::User;
use crate::domain::validation::require_str;

pub struct PullRequestService {
    tx_manager: Arc<dyn TransactionManager>,
}

impl PullRequestService {
    pub fn new(tx_manager: Arc<dyn TransactionManager>) -> Self {
        Self { tx_manager }
    }

    /// Creates a pull request and assigns up to two reviewers from the
    /// author's team, atomically.
    ///
    /// Selection rule: active teammates of the author, minus the author,
    /// sorted by `(username, user_id)`; the first two win. A pool yielding
    /// fewer than two reviewers is not an error — the PR is created with
    /// `need_more_reviewers = true`.
    pub async fn create_pull_request(&self, new_pr: NewPullRequest) -> DomainResult<PullRequest> {
        let id = require_str("pull_request_id", &new_pr.id)?;
        let name = require_str("pull_request_name", &new_pr.name)?;
        let author_id = require_str("author_id", &new_pr.author_id)?;
        let created_at = new_pr.created_at.unwrap_or_else(Utc::now);

        let mut pr = PullRequest::new(id, name, author_id, created_at);

        let mut uow = self.tx_manager.begin().await?;
        let result = Self::create_in_tx(uow.as_mut(), &mut pr).await;

        match result {
            Ok(()) => {
                uow.commit().await?;
                Ok(pr)
            }
            Err(err) => {
                tracing::warn!(pr_id = %pr.id, error = %err, "failed to create pull request");
                if let Err(rb_err) = uow.rollback().await {
                    tracing::error!(error = %rb_err, "transaction rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Marks the pull request merged. Idempotent at the entity level; the
    /// update is still written on repeat calls.
    pub async fn merge_pull_request(&self, pr_id: &str) -> DomainResult<PullRequest> {
        let pr_id = require_str("pull_request_id", pr_id)?;

        let mut uow = self.tx_manager.begin().await?;
        let result = Self::merge_in_tx(uow.as_mut(), &pr_id).await;

        match result {
            Ok(pr) => {
                uow.commit().await?;
                Ok(pr)
            }
            Err(err) => {
                tracing::warn!(pr_id = %pr_id, error = %err, "failed to merge pull request");
                if let Err(rb_err) = uow.rollback().await {
                    tracing::error!(error = %rb_err, "transaction rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Replaces `old_reviewer_id` on the pull request with another active
    /// member of the *old reviewer's* team (which may differ from the
    /// author's team).
    ///
    /// The first pool member not already involved with the PR wins; if none
    /// qualifies the call fails with `NO_CANDIDATE` and nothing changes.
    pub async fn reassign_reviewer(
        &self,
        pr_id: &str,
        old_reviewer_id: &str,
    ) -> DomainResult<(PullRequest, ReviewerChange)> {
        let pr_id = require_str("pull_request_id", pr_id)?;
        let old_reviewer_id = require_str("reviewer_id", old_reviewer_id)?;

        let mut uow = self.tx_manager.begin().await?;
        let result = Self::reassign_in_tx(uow.as_mut(), &pr_id, &old_reviewer_id).await;

        match result {
            Ok(outcome) => {
                uow.commit().await?;
                Ok(outcome)
            }
            Err(err) => {
                tracing::warn!(
                    pr_id = %pr_id,
                    reviewer_id = %old_reviewer_id,
                    error = %err,
                    "failed to reassign reviewer"
                );
                if let Err(rb_err) = uow.rollback().await {
                    tracing::error!(error = %rb_err, "transaction rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn create_in_tx(uow: &mut dyn UnitOfWork, pr: &mut PullRequest) -> DomainResult<()> {
        let author = uow.get_user(&pr.author_id).await?;
        let team = uow.get_team(&author.team_name).await?;

        let pool = Self::reviewer_pool(team.active_members_excluding(&pr.author_id));
        pr.assign_reviewers(&pool)?;

        uow.insert_pull_request(pr).await
    }

    async fn merge_in_tx(uow: &mut dyn UnitOfWork, pr_id: &str) -> DomainResult<PullRequest> {
        let mut pr = uow.get_pull_request(pr_id).await?;

        pr.merge(Utc::now());
        uow.update_pull_request(&pr).await?;

        Ok(pr)
    }

    async fn reassign_in_tx(
        uow: &mut dyn UnitOfWork,
        pr_id: &str,
        old_reviewer_id: &str,
    ) -> DomainResult<(PullRequest, ReviewerChange)> {
        let mut pr = uow.get_pull_request(pr_id).await?;

        if pr.status == PrStatus::Merged {
            return Err(DomainError::PullRequestMerged(pr.id));
        }

        let reviewer = uow.get_user(old_reviewer_id).await?;
        let team = uow.get_team(&reviewer.team_name).await?;

        let replacement = Self::pick_replacement(&team, &pr, old_reviewer_id)?;
        let change = pr.replace_reviewer(old_reviewer_id, Some(&replacement))?;

        uow.update_pull_request(&pr).await?;

        Ok((pr, change))
    }

    /// Orders candidates by `(username, user_id)` and deduplicates by id,
    /// keeping the first occurrence. The explicit sort is what makes
    /// reviewer selection deterministic; no container order is trusted.
    fn reviewer_pool(mut members: Vec<&User>) -> Vec<String> {
        members.sort_by(|a, b| a.username.cmp(&b.username).then_with(|| a.id.cmp(&b.id)));

        let mut seen: HashSet<&str> = HashSet::with_capacity(members.len());
        let mut pool = Vec::with_capacity(members.len());

        for member in members {
            let id = member.id.trim();

            if id.is_empty() || !seen.insert(id) {
                continue;
            }

            pool.push(id.to_string());
        }

        pool
    }

    /// Walks the candidate pool in order and returns the first id not
    /// already involved with the PR: current reviewers, the outgoing
    /// reviewer, and the author are all excluded.
    fn pick_replacement(team: &Team, pr: &PullRequest, old_reviewer_id: &str) -> DomainResult<String> {
        let candidates = Self::reviewer_pool(team.active_members_excluding(&pr.author_id));
        if candidates.is_empty() {
            return Err(DomainError::NoCandidate(team.name.clone()));
        }

        let mut excluded: HashSet<&str> = pr
            .assigned_reviewers
            .iter()
            .map(String::as_str)
            .collect();
        excluded.insert(old_reviewer_id);
        excluded.insert(pr.author_id.as_str());

        candidates
            .into_iter()
            .find(|candidate| !excluded.contains(candidate.as_str()))
            .ok_or_else(|| DomainError::NoCandidate(team.name.clone()))
    }
}
