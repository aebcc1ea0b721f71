//! Service-level flows over the in-memory store: team creation, reviewer
//! assignment and reassignment, merge idempotency, and stats.

mod common;

use std::sync::Arc;

use review_rota::domain::errors::DomainError;
use review_rota::domain::pull_request::{NewPullRequest, PrStatus, ReviewerChange};
use review_rota::domain::user::NewMember;
use review_rota::services::{PullRequestService, StatsService, TeamService, UserService};

use common::InMemoryStore;

struct TestApp {
    store: InMemoryStore,
    teams: TeamService,
    users: UserService,
    pull_requests: PullRequestService,
    stats: StatsService,
}

fn setup() -> TestApp {
    let store = InMemoryStore::new();
    let as_arc = Arc::new(store.clone());

    TestApp {
        store,
        teams: TeamService::new(as_arc.clone(), as_arc.clone()),
        users: UserService::new(as_arc.clone(), as_arc.clone()),
        pull_requests: PullRequestService::new(as_arc.clone()),
        stats: StatsService::new(as_arc.clone(), as_arc.clone(), as_arc),
    }
}

fn member(id: &str, username: &str) -> NewMember {
    NewMember {
        id: id.to_string(),
        username: username.to_string(),
        is_active: true,
    }
}

fn new_pr(id: &str, author_id: &str) -> NewPullRequest {
    NewPullRequest {
        id: id.to_string(),
        name: format!("PR {id}"),
        author_id: author_id.to_string(),
        created_at: None,
    }
}

async fn seed_core_team(app: &TestApp) {
    app.teams
        .create_team(
            "core",
            vec![
                member("a", "alice"),
                member("b", "bob"),
                member("c", "carol"),
                member("d", "dave"),
            ],
        )
        .await
        .expect("team creation failed");
}

#[tokio::test]
async fn create_team_persists_members() {
    let app = setup();

    seed_core_team(&app).await;

    let team = app.teams.get_team("core").await.unwrap();
    assert_eq!(team.member_count(), 4);
    assert_eq!(team.member("b").unwrap().username, "bob");
    assert_eq!(team.member("b").unwrap().team_name, "core");
}

#[tokio::test]
async fn duplicate_team_name_is_rejected_without_partial_writes() {
    let app = setup();
    seed_core_team(&app).await;

    let err = app
        .teams
        .create_team("core", vec![member("x", "xavier")])
        .await
        .unwrap_err();

    assert_eq!(err, DomainError::TeamExists("core".into()));
    // The rejected batch's member must not have leaked into storage.
    assert!(app.store.user("x").is_none());
    assert_eq!(app.store.user_count(), 4);
}

#[tokio::test]
async fn create_pull_request_assigns_two_reviewers_by_username() {
    let app = setup();
    seed_core_team(&app).await;

    let pr = app
        .pull_requests
        .create_pull_request(new_pr("pr-1", "a"))
        .await
        .unwrap();

    // Candidates sorted by username: bob, carol, dave. First two win.
    assert_eq!(pr.assigned_reviewers, vec!["b", "c"]);
    assert!(!pr.need_more_reviewers);
    assert_eq!(pr.status, PrStatus::Open);

    let stored = app.store.pull_request("pr-1").unwrap();
    assert_eq!(stored.assigned_reviewers, vec!["b", "c"]);
}

#[tokio::test]
async fn create_pull_request_degrades_gracefully_on_small_pool() {
    let app = setup();
    app.teams
        .create_team("solo", vec![member("only", "omar")])
        .await
        .unwrap();

    let pr = app
        .pull_requests
        .create_pull_request(new_pr("pr-solo", "only"))
        .await
        .unwrap();

    assert!(pr.assigned_reviewers.is_empty());
    assert!(pr.need_more_reviewers);
    assert!(app.store.pull_request("pr-solo").is_some());
}

#[tokio::test]
async fn create_pull_request_skips_inactive_members() {
    let app = setup();
    seed_core_team(&app).await;
    app.users.set_activity("b", false).await.unwrap();

    let pr = app
        .pull_requests
        .create_pull_request(new_pr("pr-1", "a"))
        .await
        .unwrap();

    assert_eq!(pr.assigned_reviewers, vec!["c", "d"]);
}

#[tokio::test]
async fn duplicate_pull_request_id_is_rejected() {
    let app = setup();
    seed_core_team(&app).await;
    app.pull_requests
        .create_pull_request(new_pr("pr-1", "a"))
        .await
        .unwrap();

    let err = app
        .pull_requests
        .create_pull_request(new_pr("pr-1", "b"))
        .await
        .unwrap_err();

    assert_eq!(err, DomainError::PullRequestExists("pr-1".into()));
    // The original row survives untouched.
    assert_eq!(app.store.pull_request("pr-1").unwrap().author_id, "a");
}

#[tokio::test]
async fn create_pull_request_with_unknown_author_fails() {
    let app = setup();
    seed_core_team(&app).await;

    let err = app
        .pull_requests
        .create_pull_request(new_pr("pr-1", "ghost"))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn reassign_replaces_reviewer_in_place() {
    let app = setup();
    seed_core_team(&app).await;
    app.pull_requests
        .create_pull_request(new_pr("pr-1", "a"))
        .await
        .unwrap();

    let (pr, change) = app
        .pull_requests
        .reassign_reviewer("pr-1", "b")
        .await
        .unwrap();

    // Dave is the only teammate not yet involved; he takes bob's slot.
    assert_eq!(change, ReviewerChange::Replaced("d".into()));
    assert_eq!(pr.assigned_reviewers, vec!["d", "c"]);
    assert_eq!(app.store.pull_request("pr-1").unwrap().assigned_reviewers, vec!["d", "c"]);
}

#[tokio::test]
async fn reassign_fails_with_no_candidate_when_pool_is_exhausted() {
    let app = setup();
    app.teams
        .create_team(
            "trio",
            vec![member("a", "alice"), member("b", "bob"), member("c", "carol")],
        )
        .await
        .unwrap();
    app.pull_requests
        .create_pull_request(new_pr("pr-1", "a"))
        .await
        .unwrap();

    let err = app
        .pull_requests
        .reassign_reviewer("pr-1", "b")
        .await
        .unwrap_err();

    assert_eq!(err, DomainError::NoCandidate("trio".into()));
    // Nothing changed.
    assert_eq!(app.store.pull_request("pr-1").unwrap().assigned_reviewers, vec!["b", "c"]);
}

#[tokio::test]
async fn reassign_fails_for_reviewer_not_assigned() {
    let app = setup();
    app.teams
        .create_team(
            "big",
            vec![
                member("a", "alice"),
                member("b", "bob"),
                member("c", "carol"),
                member("d", "dave"),
                member("e", "erin"),
            ],
        )
        .await
        .unwrap();
    app.pull_requests
        .create_pull_request(new_pr("pr-1", "a"))
        .await
        .unwrap();

    // Reviewers are [b, c]; dave is a teammate but holds no slot.
    let err = app
        .pull_requests
        .reassign_reviewer("pr-1", "d")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        DomainError::NotAssigned {
            user_id: "d".into(),
            pr_id: "pr-1".into(),
        }
    );
}

#[tokio::test]
async fn reassign_on_merged_pull_request_is_rejected() {
    let app = setup();
    seed_core_team(&app).await;
    app.pull_requests
        .create_pull_request(new_pr("pr-1", "a"))
        .await
        .unwrap();
    app.pull_requests.merge_pull_request("pr-1").await.unwrap();

    let err = app
        .pull_requests
        .reassign_reviewer("pr-1", "b")
        .await
        .unwrap_err();

    assert_eq!(err, DomainError::PullRequestMerged("pr-1".into()));
    assert_eq!(app.store.pull_request("pr-1").unwrap().assigned_reviewers, vec!["b", "c"]);
}

#[tokio::test]
async fn merge_is_idempotent() {
    let app = setup();
    seed_core_team(&app).await;
    app.pull_requests
        .create_pull_request(new_pr("pr-1", "a"))
        .await
        .unwrap();

    let first = app.pull_requests.merge_pull_request("pr-1").await.unwrap();
    let second = app.pull_requests.merge_pull_request("pr-1").await.unwrap();

    assert_eq!(first.status, PrStatus::Merged);
    assert_eq!(second.status, PrStatus::Merged);
    assert_eq!(first.merged_at, second.merged_at);
}

#[tokio::test]
async fn get_reviewer_assignments_lists_newest_first() {
    let app = setup();
    seed_core_team(&app).await;

    for (id, offset) in [("pr-old", 60), ("pr-new", 0)] {
        app.pull_requests
            .create_pull_request(NewPullRequest {
                id: id.to_string(),
                name: format!("PR {id}"),
                author_id: "a".to_string(),
                created_at: Some(chrono::Utc::now() - chrono::Duration::seconds(offset)),
            })
            .await
            .unwrap();
    }

    let prs = app.users.get_reviewer_assignments("b").await.unwrap();
    let ids: Vec<&str> = prs.iter().map(|pr| pr.id.as_str()).collect();

    assert_eq!(ids, vec!["pr-new", "pr-old"]);
}

#[tokio::test]
async fn get_reviewer_assignments_breaks_creation_ties_by_pr_id() {
    let app = setup();
    seed_core_team(&app).await;

    let created_at = chrono::Utc::now();
    for id in ["pr-b", "pr-a", "pr-c"] {
        app.pull_requests
            .create_pull_request(NewPullRequest {
                id: id.to_string(),
                name: format!("PR {id}"),
                author_id: "a".to_string(),
                created_at: Some(created_at),
            })
            .await
            .unwrap();
    }

    let prs = app.users.get_reviewer_assignments("b").await.unwrap();
    let ids: Vec<&str> = prs.iter().map(|pr| pr.id.as_str()).collect();

    assert_eq!(ids, vec!["pr-a", "pr-b", "pr-c"]);
}

#[tokio::test]
async fn get_reviewer_assignments_requires_existing_user() {
    let app = setup();
    seed_core_team(&app).await;

    let err = app.users.get_reviewer_assignments("ghost").await.unwrap_err();

    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn set_activity_unknown_user_fails() {
    let app = setup();
    seed_core_team(&app).await;

    let err = app.users.set_activity("ghost", false).await.unwrap_err();

    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn stats_aggregate_all_counters() {
    let app = setup();
    seed_core_team(&app).await;
    app.pull_requests
        .create_pull_request(new_pr("pr-1", "a"))
        .await
        .unwrap();
    app.pull_requests
        .create_pull_request(new_pr("pr-2", "d"))
        .await
        .unwrap();

    let stats = app.stats.get_stats().await.unwrap();

    assert_eq!(stats.teams, 1);
    assert_eq!(stats.users, 4);
    assert_eq!(stats.pull_requests, 2);
    assert_eq!(stats.assignments, 4);
}

#[tokio::test]
async fn blank_identifiers_are_rejected_before_touching_storage() {
    let app = setup();

    let err = app.teams.create_team("   ", vec![]).await.unwrap_err();
    assert_eq!(err, DomainError::Required { field: "team_name" });

    let err = app
        .pull_requests
        .create_pull_request(new_pr("", "a"))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Required { field: "pull_request_id" });

    assert!(app.store.team_names().is_empty());
}
