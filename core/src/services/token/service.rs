//! Main token service implementation

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{TimeZone, Utc};
use jsonwebtoken::{
    decode, decode_header, encode, DecodingKey, EncodingKey, Header, Validation,
};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::{debug, info};

use crate::domain::entities::token::{Claims, RefreshToken};
use crate::domain::entities::user::User;
use crate::domain::value_objects::AuthTokens;
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::RefreshTokenRepository;

use super::config::TokenServiceConfig;

/// Number of random bytes drawn for each refresh token value
const REFRESH_TOKEN_BYTES: usize = 64;

/// Service for issuing and validating access tokens and managing the
/// refresh token store
pub struct TokenService<R: RefreshTokenRepository> {
    pub(crate) repository: Arc<R>,
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl<R: RefreshTokenRepository> TokenService<R> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `repository` - Refresh token repository for persistence
    /// * `config` - Token service configuration
    ///
    /// # Returns
    ///
    /// A new `TokenService`, or an error if the signing key is unusable.
    /// A missing or empty secret is a fatal startup configuration error,
    /// never a per-call failure.
    pub fn new(repository: Arc<R>, config: TokenServiceConfig) -> Result<Self, DomainError> {
        if config.jwt_secret.is_empty() {
            return Err(DomainError::Internal {
                message: "JWT signing secret must not be empty".to_string(),
            });
        }

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Ok(Self {
            repository,
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// Issues a signed access token for a user
    ///
    /// Pure function of its inputs and the process configuration: builds
    /// the claims set, signs it with the configured symmetric key, and
    /// sets expiry to issuance time plus the configured lifetime. Nothing
    /// is persisted.
    ///
    /// # Arguments
    ///
    /// * `user` - The authenticated user
    /// * `owner_id` - Owner profile ID already resolved by the caller
    pub fn issue_access_token(&self, user: &User, owner_id: i64) -> DomainResult<String> {
        let claims = self.build_claims(user, owner_id);
        self.encode_jwt(&claims)
    }

    /// Generates a new opaque refresh token value
    ///
    /// Draws 64 bytes from the OS CSPRNG and encodes them as unpadded
    /// URL-safe base64, so values are infeasible to guess or enumerate.
    pub fn generate_refresh_token(&self) -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Issues a full credential pair and persists the refresh token record
    ///
    /// This is the login-issuance composition: the caller has already
    /// authenticated the user and resolved the owner profile.
    ///
    /// # Arguments
    ///
    /// * `user` - The authenticated user
    /// * `owner_id` - Owner profile ID bound into the access token claims
    /// * `device_info` - Device descriptor stored on the refresh record
    pub async fn issue_tokens(
        &self,
        user: &User,
        owner_id: i64,
        device_info: Option<String>,
    ) -> DomainResult<AuthTokens> {
        let claims = self.build_claims(user, owner_id);
        let access_token = self.encode_jwt(&claims)?;
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or_else(|| DomainError::Internal {
                message: "Invalid access token expiry timestamp".to_string(),
            })?;

        let refresh_value = self.generate_refresh_token();
        let record = RefreshToken::new(
            user.id,
            refresh_value.clone(),
            device_info,
            self.config.refresh_token_expiry_days,
        );
        self.repository.save(record).await?;

        debug!(user_id = user.id, "issued new token pair");

        Ok(AuthTokens::new(access_token, refresh_value, expires_at))
    }

    /// Verifies an access token and returns the claims
    ///
    /// Full validation: signature, expiry, not-before, issuer, audience.
    pub fn verify_access_token(&self, token: &str) -> DomainResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(Self::map_decode_error)?;

        Ok(token_data.claims)
    }

    /// Extracts claims from a token whose expiry may have passed
    ///
    /// Verifies signature, issuer, and audience exactly as normal
    /// validation and additionally rejects a token whose declared signing
    /// algorithm differs from the configured one, but does not reject
    /// solely because the token has expired. Used by callers that need to
    /// recover an identity from a known-stale token.
    pub fn decode_expired_claims(&self, token: &str) -> DomainResult<Claims> {
        let header = decode_header(token)
            .map_err(|_| DomainError::Token(TokenError::InvalidTokenFormat))?;
        if header.alg != self.config.algorithm {
            return Err(DomainError::Token(TokenError::AlgorithmMismatch));
        }

        let mut validation = self.validation.clone();
        validation.validate_exp = false;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(Self::map_decode_error)?;

        Ok(token_data.claims)
    }

    /// Revokes a single refresh token (logout)
    ///
    /// Idempotent: a missing or already-revoked token is a successful
    /// no-op, and the original revocation timestamp is never disturbed.
    pub async fn revoke_refresh_token(&self, token_value: &str) -> DomainResult<()> {
        let revoked = self.repository.mark_revoked(token_value, Utc::now()).await?;
        if revoked {
            debug!("refresh token revoked on request");
        }
        Ok(())
    }

    /// Revokes every live refresh token belonging to a user
    ///
    /// The blast-radius response to reuse detection; also usable for
    /// administrative session teardown.
    pub async fn revoke_all_user_tokens(&self, user_id: i64) -> DomainResult<usize> {
        let count = self
            .repository
            .revoke_all_for_user(user_id, Utc::now())
            .await?;
        info!(user_id, count, "revoked all refresh tokens for user");
        Ok(count)
    }

    /// Access token lifetime in minutes, as configured
    pub fn access_token_expiry_minutes(&self) -> i64 {
        self.config.access_token_expiry_minutes
    }

    fn build_claims(&self, user: &User, owner_id: i64) -> Claims {
        Claims::new_access_token(
            user,
            owner_id,
            &self.config.issuer,
            &self.config.audience,
            self.config.access_token_expiry_minutes,
        )
    }

    /// Encodes claims into a signed JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> DomainResult<String> {
        let header = Header::new(self.config.algorithm);
        encode(&header, claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    fn map_decode_error(err: jsonwebtoken::errors::Error) -> DomainError {
        use jsonwebtoken::errors::ErrorKind;

        let token_error = match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::TokenExpired,
            ErrorKind::ImmatureSignature => TokenError::TokenNotYetValid,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidAlgorithm => TokenError::AlgorithmMismatch,
            ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience | ErrorKind::InvalidSubject => {
                TokenError::InvalidClaims
            }
            _ => TokenError::InvalidTokenFormat,
        };

        DomainError::Token(token_error)
    }
}
