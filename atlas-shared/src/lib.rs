//! # Atlas Shared Library
//!
//! This crate contains the data layer and auth domain logic shared by the
//! Atlas directory backend.
//!
//! ## Module Organization
//!
//! - `db`: PostgreSQL connection pool
//! - `models`: Database models, one module per table
//! - `auth`: Password hashing, session tokens, credential management

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Atlas shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
