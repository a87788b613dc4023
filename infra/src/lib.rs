//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the PawCare
//! backend. It provides the MySQL-backed implementations of the core
//! repository traits along with connection pool management.

pub mod database;

pub use database::{
    DatabasePool, MySqlOwnerRepository, MySqlRefreshTokenRepository, MySqlUserRepository,
};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
