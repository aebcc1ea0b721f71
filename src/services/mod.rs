// Application services orchestrating entities and persistence ports.
// The reviewer selection and replacement algorithms live here.

pub mod pull_request_service;
pub mod stats_service;
pub mod team_service;
pub mod user_service;

pub use pull_request_service::PullRequestService;
pub use stats_service::{Stats, StatsService};
pub use team_service::TeamService;
pub use user_service::UserService;
