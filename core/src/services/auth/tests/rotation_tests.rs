//! Rotation protocol tests: success path, failure taxonomy, reuse
//! detection, and the concurrent single-winner guarantee.

use chrono::{Duration, Utc};

use super::mocks::{harness, sample_owner, sample_user, single_owner_harness};
use crate::domain::entities::token::RefreshToken;
use crate::domain::entities::user::{AccountStatus, AccountType};
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::token_repository::RefreshTokenRepository;

#[tokio::test]
async fn test_rotation_issues_successor_bound_to_same_user() {
    let h = single_owner_harness();
    let user = sample_user(1);
    let owner = sample_owner(10, 1);

    let issued = h
        .service
        .login(&user, &owner, Some("iPad".to_string()))
        .await
        .unwrap();

    let rotated = h.service.rotate_tokens(&issued.refresh_token).await.unwrap();

    // New access token is bound to the same user and owner
    let claims = h
        .token_service
        .verify_access_token(&rotated.access_token)
        .unwrap();
    assert_eq!(claims.user_id().unwrap(), 1);
    assert_eq!(claims.owner_id, 10);

    // Old record is retired and linked to its successor
    let old = h
        .tokens
        .find_by_token(&issued.refresh_token)
        .await
        .unwrap()
        .unwrap();
    assert!(old.is_revoked());
    assert_eq!(old.replaced_by, Some(rotated.refresh_token.clone()));

    // Successor is active and carries the device descriptor forward
    let new = h
        .tokens
        .find_by_token(&rotated.refresh_token)
        .await
        .unwrap()
        .unwrap();
    assert!(new.is_active());
    assert!(new.replaced_by.is_none());
    assert_eq!(new.device_info, Some("iPad".to_string()));
}

#[tokio::test]
async fn test_rotation_scenario_with_default_lifetimes() {
    let h = single_owner_harness();
    let record = RefreshToken::new(1, "seed-token".to_string(), None, 30);
    h.tokens.insert(record).await;

    let before = Utc::now();
    let rotated = h.service.rotate_tokens("seed-token").await.unwrap();

    // Access token expires roughly 60 minutes out under default config
    let lifetime = rotated.expires_at - before;
    assert!(lifetime <= Duration::minutes(60));
    assert!(lifetime > Duration::minutes(59));

    // Store now holds the revoked original and exactly one active record
    let old = h.tokens.find_by_token("seed-token").await.unwrap().unwrap();
    assert!(old.revoked_at.is_some());

    let active = h.tokens.find_active_by_user(1).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].token, rotated.refresh_token);
}

#[tokio::test]
async fn test_rotating_same_value_twice_detects_reuse() {
    let h = single_owner_harness();
    let user = sample_user(1);
    let owner = sample_owner(10, 1);

    let issued = h.service.login(&user, &owner, None).await.unwrap();
    let rotated = h.service.rotate_tokens(&issued.refresh_token).await.unwrap();

    // Replaying the consumed token is a reuse signal
    let result = h.service.rotate_tokens(&issued.refresh_token).await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::ReuseDetected))
    ));

    // The still-valid successor went down with the family
    let successor = h
        .tokens
        .find_by_token(&rotated.refresh_token)
        .await
        .unwrap()
        .unwrap();
    assert!(successor.is_revoked());
    assert!(h.tokens.find_active_by_user(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reuse_detection_spares_other_users() {
    let h = harness(
        vec![sample_user(1), sample_user(2)],
        vec![sample_owner(10, 1), sample_owner(20, 2)],
    );

    let issued = h
        .service
        .login(&sample_user(1), &sample_owner(10, 1), None)
        .await
        .unwrap();
    let bystander = h
        .service
        .login(&sample_user(2), &sample_owner(20, 2), None)
        .await
        .unwrap();

    h.service.rotate_tokens(&issued.refresh_token).await.unwrap();
    let result = h.service.rotate_tokens(&issued.refresh_token).await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::ReuseDetected))
    ));

    // Family revocation is scoped to the affected user
    let other = h
        .tokens
        .find_by_token(&bystander.refresh_token)
        .await
        .unwrap()
        .unwrap();
    assert!(other.is_active());
}

#[tokio::test]
async fn test_rotating_expired_token_fails_without_side_effects() {
    let h = single_owner_harness();

    let mut expired = RefreshToken::new(1, "expired-token".to_string(), None, 30);
    expired.expires_at = Utc::now() - Duration::days(1);
    h.tokens.insert(expired).await;

    let other = RefreshToken::new(1, "live-token".to_string(), None, 30);
    h.tokens.insert(other).await;

    let result = h.service.rotate_tokens("expired-token").await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::RefreshTokenExpired))
    ));

    // Expiry is not a security event: nothing else was touched
    let live = h.tokens.find_by_token("live-token").await.unwrap().unwrap();
    assert!(live.is_active());
    let expired = h
        .tokens
        .find_by_token("expired-token")
        .await
        .unwrap()
        .unwrap();
    assert!(!expired.is_revoked());
}

#[tokio::test]
async fn test_expired_and_revoked_token_still_triggers_reuse() {
    let h = single_owner_harness();

    let mut record = RefreshToken::new(1, "stale-token".to_string(), None, 30);
    record.expires_at = Utc::now() - Duration::days(1);
    record.revoke(Utc::now() - Duration::days(2));
    h.tokens.insert(record).await;

    let live = RefreshToken::new(1, "live-token".to_string(), None, 30);
    h.tokens.insert(live).await;

    // The revoked check runs before the expiry check
    let result = h.service.rotate_tokens("stale-token").await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::ReuseDetected))
    ));
    assert!(h.tokens.find_active_by_user(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rotating_unknown_value_is_invalid() {
    let h = single_owner_harness();

    let result = h.service.rotate_tokens("never-issued").await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidRefreshToken))
    ));
}

#[tokio::test]
async fn test_rotation_rejects_missing_user() {
    // Token exists but its user does not
    let h = harness(vec![], vec![]);
    h.tokens
        .insert(RefreshToken::new(99, "orphan-token".to_string(), None, 30))
        .await;

    let result = h.service.rotate_tokens("orphan-token").await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::AccountUnauthorized))
    ));
}

#[tokio::test]
async fn test_rotation_rejects_inactive_user() {
    let mut user = sample_user(1);
    user.status = AccountStatus::Suspended;
    let h = harness(vec![user], vec![sample_owner(10, 1)]);

    h.tokens
        .insert(RefreshToken::new(1, "token".to_string(), None, 30))
        .await;

    let result = h.service.rotate_tokens("token").await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::AccountUnauthorized))
    ));
}

#[tokio::test]
async fn test_rotation_rejects_non_owner_account() {
    let mut user = sample_user(1);
    user.account_type = AccountType::Veterinarian;
    let h = harness(vec![user], vec![sample_owner(10, 1)]);

    h.tokens
        .insert(RefreshToken::new(1, "token".to_string(), None, 30))
        .await;

    let result = h.service.rotate_tokens("token").await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::AccountUnauthorized))
    ));
}

#[tokio::test]
async fn test_rotation_rejects_user_without_owner_profile() {
    let h = harness(vec![sample_user(1)], vec![]);

    h.tokens
        .insert(RefreshToken::new(1, "token".to_string(), None, 30))
        .await;

    let result = h.service.rotate_tokens("token").await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::OwnerProfileNotFound))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_rotation_has_single_winner() {
    let h = single_owner_harness();
    h.tokens
        .insert(RefreshToken::new(1, "contended".to_string(), None, 30))
        .await;

    let service_a = h.service.clone();
    let service_b = h.service.clone();

    let (a, b) = tokio::join!(
        tokio::spawn(async move { service_a.rotate_tokens("contended").await }),
        tokio::spawn(async move { service_b.rotate_tokens("contended").await }),
    );
    let results = [a.unwrap(), b.unwrap()];

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one rotation may produce a pair");

    // The loser observed a no-longer-valid token: reuse handling applies
    let loser = results.iter().find(|r| r.is_err()).unwrap();
    assert!(matches!(
        loser,
        Err(DomainError::Token(TokenError::ReuseDetected))
    ));
}
