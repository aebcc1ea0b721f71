//! Review Rota API Library
//!
//! Tracks teams, users, and pull requests, and assigns or reassigns code
//! reviewers according to team membership and activity rules. Domain logic,
//! persistence ports, and the HTTP adapter live here.

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod services;
