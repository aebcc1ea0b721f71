//! Shared SQL for the PostgreSQL adapters.
//!
//! Every function takes an explicit `&mut PgConnection` so the same query
//! code serves both pool-backed repositories and transaction-scoped units
//! of work. Constraint violations are translated into domain errors here,
//! at the storage boundary.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Row};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::pull_request::{PrStatus, PullRequest};
use crate::domain::team::Team;
use crate::domain::user::User;

const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

pub(crate) fn storage(err: sqlx::Error) -> DomainError {
    DomainError::Storage(err.to_string())
}

fn has_pg_code(err: &sqlx::Error, code: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(code),
        _ => false,
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    has_pg_code(err, PG_UNIQUE_VIOLATION)
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    has_pg_code(err, PG_FOREIGN_KEY_VIOLATION)
}

// ===== teams =====

pub(crate) async fn insert_team(conn: &mut PgConnection, team: &Team) -> DomainResult<()> {
    sqlx::query("INSERT INTO teams (team_name, created_at, updated_at) VALUES ($1, $2, $3)")
        .bind(&team.name)
        .bind(team.created_at)
        .bind(team.updated_at)
        .execute(&mut *conn)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                tracing::warn!(team_name = %team.name, "team already exists");
                DomainError::TeamExists(team.name.clone())
            } else {
                storage(err)
            }
        })?;

    Ok(())
}

pub(crate) async fn get_team(conn: &mut PgConnection, team_name: &str) -> DomainResult<Team> {
    let rows = sqlx::query(
        r#"
        SELECT
            t.team_name, t.created_at AS team_created_at, t.updated_at AS team_updated_at,
            u.user_id, u.username, u.is_active, u.created_at, u.updated_at
        FROM teams t
        LEFT JOIN users u ON u.team_name = t.team_name
        WHERE t.team_name = $1
        ORDER BY u.username ASC, u.user_id ASC
        "#,
    )
    .bind(team_name)
    .fetch_all(&mut *conn)
    .await
    .map_err(storage)?;

    let mut team: Option<Team> = None;

    for row in rows {
        if team.is_none() {
            team = Some(Team::new(
                row.try_get::<String, _>("team_name").map_err(storage)?,
                row.try_get::<DateTime<Utc>, _>("team_created_at").map_err(storage)?,
                row.try_get::<DateTime<Utc>, _>("team_updated_at").map_err(storage)?,
            ));
        }

        let user_id: Option<String> = row.try_get("user_id").map_err(storage)?;
        if let (Some(team), Some(user_id)) = (team.as_mut(), user_id) {
            team.upsert_member(User {
                id: user_id,
                username: row.try_get("username").map_err(storage)?,
                team_name: team_name.to_string(),
                is_active: row.try_get("is_active").map_err(storage)?,
                created_at: row.try_get("created_at").map_err(storage)?,
                updated_at: row.try_get("updated_at").map_err(storage)?,
            });
        }
    }

    team.ok_or_else(|| DomainError::not_found(format!("team {team_name}")))
}

pub(crate) async fn count_teams(conn: &mut PgConnection) -> DomainResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM teams")
        .fetch_one(&mut *conn)
        .await
        .map_err(storage)?;

    Ok(count)
}

// ===== users =====

fn map_user(row: &PgRow) -> DomainResult<User> {
    Ok(User {
        id: row.try_get("user_id").map_err(storage)?,
        username: row.try_get("username").map_err(storage)?,
        team_name: row.try_get("team_name").map_err(storage)?,
        is_active: row.try_get("is_active").map_err(storage)?,
        created_at: row.try_get("created_at").map_err(storage)?,
        updated_at: row.try_get("updated_at").map_err(storage)?,
    })
}

pub(crate) async fn get_user(conn: &mut PgConnection, user_id: &str) -> DomainResult<User> {
    let row = sqlx::query(
        "SELECT user_id, username, team_name, is_active, created_at, updated_at
         FROM users WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(storage)?
    .ok_or_else(|| DomainError::not_found(format!("user {user_id}")))?;

    map_user(&row)
}

pub(crate) async fn upsert_users(conn: &mut PgConnection, users: &[User]) -> DomainResult<()> {
    const QUERY: &str = r#"
        INSERT INTO users (user_id, username, team_name, is_active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id) DO UPDATE
        SET username = EXCLUDED.username,
            team_name = EXCLUDED.team_name,
            is_active = EXCLUDED.is_active,
            updated_at = EXCLUDED.updated_at
    "#;

    for user in users {
        sqlx::query(QUERY)
            .bind(&user.id)
            .bind(&user.username)
            .bind(&user.team_name)
            .bind(user.is_active)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&mut *conn)
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    tracing::warn!(
                        user_id = %user.id,
                        team_name = %user.team_name,
                        "team not found while upserting user"
                    );
                    DomainError::not_found(format!("team {}", user.team_name))
                } else {
                    storage(err)
                }
            })?;
    }

    Ok(())
}

pub(crate) async fn set_user_activity(
    conn: &mut PgConnection,
    user_id: &str,
    is_active: bool,
) -> DomainResult<User> {
    let row = sqlx::query(
        r#"
        UPDATE users
        SET is_active = $2, updated_at = $3
        WHERE user_id = $1
        RETURNING user_id, username, team_name, is_active, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(is_active)
    .bind(Utc::now())
    .fetch_optional(&mut *conn)
    .await
    .map_err(storage)?
    .ok_or_else(|| DomainError::not_found(format!("user {user_id}")))?;

    map_user(&row)
}

pub(crate) async fn count_users(conn: &mut PgConnection) -> DomainResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&mut *conn)
        .await
        .map_err(storage)?;

    Ok(count)
}

// ===== pull requests =====

fn map_pull_request(row: &PgRow) -> DomainResult<PullRequest> {
    let status_str: String = row.try_get("status").map_err(storage)?;
    let status = PrStatus::parse(&status_str)
        .ok_or_else(|| DomainError::Storage(format!("invalid pull request status: {status_str}")))?;

    // Reviewers are loaded separately; callers refresh `need_more_reviewers`.
    Ok(PullRequest {
        id: row.try_get("pull_request_id").map_err(storage)?,
        name: row.try_get("pull_request_name").map_err(storage)?,
        author_id: row.try_get("author_id").map_err(storage)?,
        status,
        assigned_reviewers: Vec::new(),
        need_more_reviewers: true,
        created_at: row.try_get("created_at").map_err(storage)?,
        merged_at: row.try_get("merged_at").map_err(storage)?,
    })
}

async fn fetch_reviewers(conn: &mut PgConnection, pr_id: &str) -> DomainResult<Vec<String>> {
    let rows = sqlx::query(
        "SELECT user_id FROM pr_reviewers
         WHERE pull_request_id = $1
         ORDER BY assigned_at ASC, user_id ASC",
    )
    .bind(pr_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(storage)?;

    rows.iter()
        .map(|row| row.try_get::<String, _>("user_id").map_err(storage))
        .collect()
}

pub(crate) async fn get_pull_request(conn: &mut PgConnection, pr_id: &str) -> DomainResult<PullRequest> {
    let row = sqlx::query(
        "SELECT pull_request_id, pull_request_name, author_id, status, created_at, merged_at
         FROM pull_requests WHERE pull_request_id = $1",
    )
    .bind(pr_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(storage)?
    .ok_or_else(|| DomainError::not_found(format!("pull request {pr_id}")))?;

    let mut pr = map_pull_request(&row)?;
    pr.assigned_reviewers = fetch_reviewers(conn, &pr.id).await?;
    pr.need_more_reviewers = pr.assigned_reviewers.len() < 2;

    Ok(pr)
}

pub(crate) async fn insert_pull_request(conn: &mut PgConnection, pr: &PullRequest) -> DomainResult<()> {
    sqlx::query(
        r#"
        INSERT INTO pull_requests
            (pull_request_id, pull_request_name, author_id, status, created_at, merged_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(&pr.id)
    .bind(&pr.name)
    .bind(&pr.author_id)
    .bind(pr.status.as_str())
    .bind(pr.created_at)
    .bind(pr.merged_at)
    .execute(&mut *conn)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            tracing::warn!(pr_id = %pr.id, "pull request already exists");
            DomainError::PullRequestExists(pr.id.clone())
        } else if is_foreign_key_violation(&err) {
            tracing::warn!(pr_id = %pr.id, author_id = %pr.author_id, "author not found");
            DomainError::not_found(format!("user {}", pr.author_id))
        } else {
            storage(err)
        }
    })?;

    add_reviewers(conn, &pr.id, &pr.assigned_reviewers).await
}

async fn add_reviewers(conn: &mut PgConnection, pr_id: &str, reviewers: &[String]) -> DomainResult<()> {
    for reviewer in reviewers {
        if reviewer.is_empty() {
            continue;
        }

        let result = sqlx::query("INSERT INTO pr_reviewers (pull_request_id, user_id) VALUES ($1, $2)")
            .bind(pr_id)
            .bind(reviewer)
            .execute(&mut *conn)
            .await;

        match result {
            Ok(_) => {}
            // Duplicate assignment rows are harmless, skip them.
            Err(err) if is_unique_violation(&err) => continue,
            Err(err) if is_foreign_key_violation(&err) => {
                tracing::warn!(pr_id = %pr_id, reviewer = %reviewer, "reviewer not found");
                return Err(DomainError::not_found(format!("user {reviewer}")));
            }
            Err(err) => return Err(storage(err)),
        }
    }

    Ok(())
}

pub(crate) async fn update_pull_request(conn: &mut PgConnection, pr: &PullRequest) -> DomainResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE pull_requests
        SET pull_request_name = $2, status = $3, merged_at = $4
        WHERE pull_request_id = $1
        "#,
    )
    .bind(&pr.id)
    .bind(&pr.name)
    .bind(pr.status.as_str())
    .bind(pr.merged_at)
    .execute(&mut *conn)
    .await
    .map_err(storage)?;

    if result.rows_affected() == 0 {
        return Err(DomainError::not_found(format!("pull request {}", pr.id)));
    }

    sqlx::query("DELETE FROM pr_reviewers WHERE pull_request_id = $1")
        .bind(&pr.id)
        .execute(&mut *conn)
        .await
        .map_err(storage)?;

    add_reviewers(conn, &pr.id, &pr.assigned_reviewers).await
}

// The result set is already filtered to one reviewer, so creation-time ties
// are broken by pull request id to keep the listing stable.
pub(crate) async fn list_pull_requests_by_reviewer(
    conn: &mut PgConnection,
    reviewer_id: &str,
) -> DomainResult<Vec<PullRequest>> {
    let rows = sqlx::query(
        r#"
        SELECT pr.pull_request_id, pr.pull_request_name, pr.author_id, pr.status,
               pr.created_at, pr.merged_at
        FROM pull_requests pr
        JOIN pr_reviewers rev ON rev.pull_request_id = pr.pull_request_id
        WHERE rev.user_id = $1
        ORDER BY pr.created_at DESC, pr.pull_request_id ASC
        "#,
    )
    .bind(reviewer_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(storage)?;

    let mut prs = Vec::with_capacity(rows.len());
    for row in &rows {
        prs.push(map_pull_request(row)?);
    }

    for pr in &mut prs {
        pr.assigned_reviewers = fetch_reviewers(conn, &pr.id).await?;
        pr.need_more_reviewers = pr.assigned_reviewers.len() < 2;
    }

    Ok(prs)
}

pub(crate) async fn count_pull_requests(conn: &mut PgConnection) -> DomainResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pull_requests")
        .fetch_one(&mut *conn)
        .await
        .map_err(storage)?;

    Ok(count)
}

pub(crate) async fn count_reviewer_assignments(conn: &mut PgConnection) -> DomainResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pr_reviewers")
        .fetch_one(&mut *conn)
        .await
        .map_err(storage)?;

    Ok(count)
}
