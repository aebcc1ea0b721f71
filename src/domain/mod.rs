// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod errors;
pub mod pull_request;
pub mod repositories;
pub mod team;
pub mod user;
pub mod validation;

pub use errors::{DomainError, DomainResult};
pub use pull_request::{NewPullRequest, PrStatus, PullRequest, ReviewerChange};
pub use team::Team;
pub use user::{NewMember, User};
