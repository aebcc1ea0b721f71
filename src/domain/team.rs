use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::user::User;

/// Team aggregate: a named group of users.
///
/// # Invariants
/// - `team_name` on every member equals the owning team's `name`
/// - one entry per user id; the first occurrence of a duplicate id wins
///
/// Member iteration order is unspecified at the entity level; callers that
/// need determinism sort explicitly (see `members_sorted` and the service
/// layer's reviewer pool construction).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub name: String,
    members: BTreeMap<String, User>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            members: BTreeMap::new(),
            created_at,
            updated_at,
        }
    }

    /// Inserts `members` into the team, stamping each with the team's name.
    /// Duplicate ids are skipped (first wins). Returns the members actually
    /// added, in input order, for persistence.
    pub fn add_members(&mut self, members: Vec<User>) -> Vec<User> {
        let mut added = Vec::with_capacity(members.len());

        for mut member in members {
            if self.members.contains_key(&member.id) {
                continue;
            }

            member.team_name = self.name.clone();
            added.push(member.clone());
            self.members.insert(member.id.clone(), member);
        }

        added
    }

    /// Inserts or replaces a single member, stamping the team name.
    pub fn upsert_member(&mut self, mut member: User) {
        member.team_name = self.name.clone();
        self.members.insert(member.id.clone(), member);
    }

    pub fn member(&self, user_id: &str) -> Option<&User> {
        self.members.get(user_id)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Members sorted by `(username, id)` — the documented listing order.
    pub fn members_sorted(&self) -> Vec<&User> {
        let mut members: Vec<&User> = self.members.values().collect();
        members.sort_by(|a, b| a.username.cmp(&b.username).then_with(|| a.id.cmp(&b.id)));
        members
    }

    /// All active members except `user_id`. Order unspecified.
    pub fn active_members_excluding(&self, user_id: &str) -> Vec<&User> {
        self.members
            .values()
            .filter(|member| member.is_active && member.id != user_id)
            .collect()
    }
}
