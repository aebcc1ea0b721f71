// Infrastructure layer module
// Contains the PostgreSQL adapters for the domain's persistence ports.
// Follows Hexagonal Architecture

pub mod repositories;
pub mod transaction;

pub use transaction::PgTransactionManager;
