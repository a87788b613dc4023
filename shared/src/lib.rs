//! Shared utilities and common types for the PawCare server
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types loaded once at startup
//! - Error response structures with stable error codes

pub mod config;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{AppConfig, DatabaseConfig, JwtConfig};
pub use types::{error_codes, ErrorResponse};
