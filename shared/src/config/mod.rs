//! Configuration module
//!
//! Configuration is read from the environment once at process startup and
//! passed into services as immutable values. Sub-modules:
//! - `auth` - JWT signing and token lifetime configuration
//! - `database` - Database connection and pool configuration

pub mod auth;
pub mod database;

pub use auth::JwtConfig;
pub use database::DatabaseConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load the full configuration from environment variables
    ///
    /// Reads a `.env` file if one is present, then falls back to the
    /// process environment. Call once at startup.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            jwt: JwtConfig::default(),
        }
    }
}
