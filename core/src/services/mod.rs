//! Business services for the credential lifecycle.

pub mod auth;
pub mod token;

pub use auth::AuthService;
pub use token::{TokenService, TokenServiceConfig};
