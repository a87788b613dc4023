//! Value objects returned by the domain services.

pub mod auth_tokens;

pub use auth_tokens::AuthTokens;
