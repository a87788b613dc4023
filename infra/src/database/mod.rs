//! Database module - MySQL implementations using SQLx
//!
//! This module provides the database access layer:
//! - Connection pool management
//! - Repository pattern implementations for the core traits

pub mod connection;
pub mod mysql;

pub use connection::DatabasePool;
pub use mysql::{MySqlOwnerRepository, MySqlRefreshTokenRepository, MySqlUserRepository};
