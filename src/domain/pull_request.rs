use chrono::{DateTime, Utc};

use super::errors::{DomainError, DomainResult};

/// Lifecycle status of a pull request. `Merged` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrStatus {
    Open,
    Merged,
}

impl PrStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrStatus::Open => "OPEN",
            PrStatus::Merged => "MERGED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "OPEN" => Some(PrStatus::Open),
            "MERGED" => Some(PrStatus::Merged),
            _ => None,
        }
    }
}

impl std::fmt::Display for PrStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a reviewer replacement.
///
/// Replacement is best effort: when no usable substitute id is supplied the
/// slot is vacated rather than erroring, and the caller learns which happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewerChange {
    Replaced(String),
    Vacated,
}

impl ReviewerChange {
    pub fn replacement(&self) -> Option<&str> {
        match self {
            ReviewerChange::Replaced(id) => Some(id),
            ReviewerChange::Vacated => None,
        }
    }
}

/// Incoming payload for pull request creation. A missing `created_at` is
/// defaulted to now by the service.
#[derive(Debug, Clone)]
pub struct NewPullRequest {
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Pull request aggregate.
///
/// # Invariants
/// - at most 2 assigned reviewers, no duplicates
/// - the author is never an assigned reviewer
/// - reviewer mutations are rejected once merged
/// - `need_more_reviewers` is derived: true iff fewer than 2 reviewers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub status: PrStatus,
    pub assigned_reviewers: Vec<String>,
    pub need_more_reviewers: bool,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        author_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            author_id: author_id.into(),
            status: PrStatus::Open,
            assigned_reviewers: Vec::with_capacity(2),
            need_more_reviewers: true,
            created_at,
            merged_at: None,
        }
    }

    /// Replaces the reviewer set with up to the first two eligible
    /// candidates, in input order. Blank ids, the author, and duplicates
    /// (first occurrence wins) are skipped. Candidate order is the caller's
    /// selection priority, so callers pass a stable pre-sorted pool.
    pub fn assign_reviewers<S: AsRef<str>>(&mut self, candidates: &[S]) -> DomainResult<()> {
        if self.status == PrStatus::Merged {
            return Err(DomainError::PullRequestMerged(self.id.clone()));
        }

        let mut assigned: Vec<String> = Vec::with_capacity(2);

        for candidate in candidates {
            let candidate = candidate.as_ref().trim();

            if candidate.is_empty() || candidate == self.author_id {
                continue;
            }

            if assigned.iter().any(|id| id == candidate) {
                continue;
            }

            assigned.push(candidate.to_string());

            if assigned.len() == 2 {
                break;
            }
        }

        self.assigned_reviewers = assigned;
        self.refresh_need_more_reviewers();
        Ok(())
    }

    /// Swaps `old_reviewer` for `replacement`, preserving the slot position.
    ///
    /// When `replacement` is `None` or already assigned, the old reviewer is
    /// removed and the slot stays empty (`ReviewerChange::Vacated`); this is
    /// deliberate best-effort policy, not an error.
    pub fn replace_reviewer(
        &mut self,
        old_reviewer: &str,
        replacement: Option<&str>,
    ) -> DomainResult<ReviewerChange> {
        if self.status == PrStatus::Merged {
            return Err(DomainError::PullRequestMerged(self.id.clone()));
        }

        let index = self
            .reviewer_index(old_reviewer)
            .ok_or_else(|| DomainError::NotAssigned {
                user_id: old_reviewer.to_string(),
                pr_id: self.id.clone(),
            })?;

        let usable = replacement.filter(|id| !id.is_empty() && !self.has_reviewer(id));

        let change = match usable {
            Some(new_reviewer) => {
                self.assigned_reviewers[index] = new_reviewer.to_string();
                ReviewerChange::Replaced(new_reviewer.to_string())
            }
            None => {
                self.assigned_reviewers.remove(index);
                ReviewerChange::Vacated
            }
        };

        self.refresh_need_more_reviewers();
        Ok(change)
    }

    /// Idempotent: merging an already merged PR leaves `merged_at` untouched.
    pub fn merge(&mut self, at: DateTime<Utc>) {
        if self.status == PrStatus::Merged {
            return;
        }

        self.status = PrStatus::Merged;
        self.merged_at = Some(at);
    }

    pub fn has_reviewer(&self, user_id: &str) -> bool {
        self.reviewer_index(user_id).is_some()
    }

    fn reviewer_index(&self, user_id: &str) -> Option<usize> {
        self.assigned_reviewers.iter().position(|id| id == user_id)
    }

    fn refresh_need_more_reviewers(&mut self) {
        self.need_more_reviewers = self.assigned_reviewers.len() < 2;
    }
}
