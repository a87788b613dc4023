//! Configuration for the token service

use std::str::FromStr;

use jsonwebtoken::Algorithm;

use crate::errors::DomainError;
use pc_shared::config::JwtConfig;

/// Configuration for the token service
///
/// Built once at startup and handed to [`super::TokenService::new`];
/// immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// JWT signing algorithm (symmetric HMAC family)
    pub algorithm: Algorithm,
    /// JWT issuer claim
    pub issuer: String,
    /// JWT audience claim
    pub audience: String,
    /// Access token expiry in minutes
    pub access_token_expiry_minutes: i64,
    /// Refresh token expiry in days
    pub refresh_token_expiry_days: i64,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-change-in-production".to_string(),
            algorithm: Algorithm::HS256,
            issuer: "pawcare".to_string(),
            audience: "pawcare-api".to_string(),
            access_token_expiry_minutes: 60,
            refresh_token_expiry_days: 30,
        }
    }
}

impl TokenServiceConfig {
    /// Build from the environment-loaded shared configuration
    ///
    /// An unparseable algorithm name is a startup configuration error.
    pub fn from_jwt_config(config: &JwtConfig) -> Result<Self, DomainError> {
        let algorithm = Algorithm::from_str(&config.algorithm).map_err(|_| DomainError::Internal {
            message: format!("Unknown JWT algorithm: {}", config.algorithm),
        })?;

        Ok(Self {
            jwt_secret: config.secret.clone(),
            algorithm,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_token_expiry_minutes: config.access_token_expiry_minutes,
            refresh_token_expiry_days: config.refresh_token_expiry_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shared_config() {
        let from_shared = TokenServiceConfig::from_jwt_config(&JwtConfig::default()).unwrap();
        let defaults = TokenServiceConfig::default();

        assert_eq!(from_shared.issuer, defaults.issuer);
        assert_eq!(from_shared.audience, defaults.audience);
        assert_eq!(from_shared.access_token_expiry_minutes, 60);
        assert_eq!(from_shared.refresh_token_expiry_days, 30);
        assert_eq!(from_shared.algorithm, Algorithm::HS256);
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let config = JwtConfig {
            algorithm: "ROT13".to_string(),
            ..JwtConfig::default()
        };

        let result = TokenServiceConfig::from_jwt_config(&config);
        assert!(matches!(result, Err(DomainError::Internal { .. })));
    }
}
