// Persistence ports consumed by the service layer.
// Implementations live in the infrastructure layer.

pub mod pull_request_repository;
pub mod team_repository;
pub mod transaction;
pub mod user_repository;

pub use pull_request_repository::PullRequestRepository;
pub use team_repository::TeamRepository;
pub use transaction::{TransactionManager, UnitOfWork};
pub use user_repository::UserRepository;
