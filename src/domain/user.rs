use chrono::{DateTime, Utc};

/// Team member participating in reviewer rotation.
///
/// `team_name` always matches the owning team; users are never hard-deleted,
/// inactive members are simply skipped during candidate selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Incoming member payload for team creation, before sanitization.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub id: String,
    pub username: String,
    pub is_active: bool,
}

impl User {
    /// Builds a user, backfilling missing timestamps: `created_at` defaults
    /// to now, `updated_at` defaults to `created_at`.
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        team_name: impl Into<String>,
        is_active: bool,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        let created_at = created_at.unwrap_or_else(Utc::now);
        let updated_at = updated_at.unwrap_or(created_at);

        Self {
            id: id.into(),
            username: username.into(),
            team_name: team_name.into(),
            is_active,
            created_at,
            updated_at,
        }
    }

    pub fn set_activity(&mut self, active: bool, at: DateTime<Utc>) {
        self.is_active = active;
        self.updated_at = at;
    }

    pub fn move_to_team(&mut self, team_name: impl Into<String>, at: DateTime<Utc>) {
        self.team_name = team_name.into();
        self.updated_at = at;
    }

    pub fn belongs_to(&self, team_name: &str) -> bool {
        self.team_name == team_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_backfills_timestamps() {
        let user = User::new("u1", "alice", "core", true, None, None);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn new_defaults_updated_at_to_created_at() {
        let created = Utc::now();
        let user = User::new("u1", "alice", "core", true, Some(created), None);
        assert_eq!(user.created_at, created);
        assert_eq!(user.updated_at, created);
    }

    #[test]
    fn set_activity_touches_updated_at() {
        let mut user = User::new("u1", "alice", "core", true, None, None);
        let later = user.updated_at + chrono::Duration::seconds(30);

        user.set_activity(false, later);

        assert!(!user.is_active);
        assert_eq!(user.updated_at, later);
    }

    #[test]
    fn belongs_to_matches_team_name() {
        let user = User::new("u1", "alice", "core", true, None, None);
        assert!(user.belongs_to("core"));
        assert!(!user.belongs_to("infra"));
    }
}
