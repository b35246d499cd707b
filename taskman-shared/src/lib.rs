//! # Taskman Shared Library
//!
//! Entities, persistence and credential handling used by the Taskman API.
//!
//! ## Module Organization
//!
//! - `models`: plain entity types (`User`, `Task`)
//! - `store`: the repository traits and their PostgreSQL and in-memory backends
//! - `auth`: Argon2id password hashing
//! - `db`: connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
