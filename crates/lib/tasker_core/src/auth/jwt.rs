//! Access/refresh token issuance and verification.
//!
//! Tokens are HS256 JWTs. Access and refresh tokens share a claim layout but
//! are signed with different secrets and carry their [`TokenKind`], so one
//! kind is never accepted where the other is expected.

use std::path::PathBuf;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::{debug, info};
use uuid::Uuid;

use super::{AuthError, Identity};
use crate::models::auth::{TokenClaims, TokenKind};
use crate::models::user::User;

/// Issue a signed access token for `user`, valid for `ttl_hours`.
pub fn issue_access_token(user: &User, secret: &[u8], ttl_hours: i64) -> Result<String, AuthError> {
    issue_token_at(TokenKind::Access, user, secret, ttl_hours, Utc::now())
}

/// Issue a signed refresh token for `user`, valid for `ttl_hours`.
pub fn issue_refresh_token(
    user: &User,
    secret: &[u8],
    ttl_hours: i64,
) -> Result<String, AuthError> {
    issue_token_at(TokenKind::Refresh, user, secret, ttl_hours, Utc::now())
}

/// Issue a token of `kind` as if the current time were `now`.
pub fn issue_token_at(
    kind: TokenKind,
    user: &User,
    secret: &[u8],
    ttl_hours: i64,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    if ttl_hours <= 0 {
        return Err(AuthError::InvalidConfiguration(format!(
            "{kind} token TTL must be positive, got {ttl_hours}h"
        )));
    }
    let expires_at = TimeDelta::try_hours(ttl_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| {
            AuthError::InvalidConfiguration(format!("{kind} token TTL out of range: {ttl_hours}h"))
        })?;
    if secret.is_empty() {
        return Err(AuthError::Signing(format!("{kind} token secret is empty")));
    }

    let claims = TokenClaims {
        sub: user.id,
        kind,
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::Signing(format!("jwt encode: {e}")))
}

/// Verify `token` against `secret`, requiring `expected` kind and an expiry
/// in the future.
pub fn verify_token(
    token: &str,
    secret: &[u8],
    expected: TokenKind,
) -> Result<TokenClaims, AuthError> {
    verify_token_at(token, secret, expected, Utc::now())
}

/// Verify `token` as an access token and resolve the caller it names.
pub fn authenticate_access_token(token: &str, secret: &[u8]) -> Result<Identity, AuthError> {
    let claims = verify_token(token, secret, TokenKind::Access)?;
    Ok(Identity::from_claims(&claims))
}

/// Verify `token` as if the current time were `now`.
///
/// Checks run in order: signature, kind, expiry. Expiry is exact: a token is
/// valid while `now < exp`, with no leeway.
pub fn verify_token_at(
    token: &str,
    secret: &[u8],
    expected: TokenKind,
    now: DateTime<Utc>,
) -> Result<TokenClaims, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidSignature);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;

    let claims = decode::<TokenClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(|e| {
            debug!(error = %e, "token rejected at decode");
            AuthError::InvalidSignature
        })?
        .claims;

    if claims.kind != expected {
        return Err(AuthError::WrongTokenKind {
            expected,
            found: claims.kind,
        });
    }

    if now.timestamp() >= claims.exp {
        return Err(AuthError::Expired);
    }

    Ok(claims)
}

/// Resolve the signing secret for `kind`.
///
/// Order: env var (`ACCESS_TOKEN_SECRET` / `REFRESH_TOKEN_SECRET`) → persisted
/// file under the user data dir → freshly generated and persisted. Each kind
/// has its own file, so the two secrets never coincide by default.
pub fn resolve_token_secret(kind: TokenKind) -> String {
    let var = match kind {
        TokenKind::Access => "ACCESS_TOKEN_SECRET",
        TokenKind::Refresh => "REFRESH_TOKEN_SECRET",
    };
    if let Ok(secret) = std::env::var(var)
        && !secret.is_empty()
    {
        return secret;
    }

    let secret_path = token_secret_path(kind);
    if let Ok(existing) = std::fs::read_to_string(&secret_path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = secret_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = std::fs::write(&secret_path, &secret);
    info!(path = %secret_path.display(), %kind, "generated new token secret");
    secret
}

/// Path to the persisted secret file for `kind`.
fn token_secret_path(kind: TokenKind) -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tasker")
        .join(format!("{kind}-token-secret"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCESS: &[u8] = b"access-secret-for-tests";
    const REFRESH: &[u8] = b"refresh-secret-for-tests";

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Alice".into(),
            email: "a@x.com".into(),
            password_hash: "$2b$10$unused".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn access_token_round_trips_identity() {
        let u = user();
        let token = issue_access_token(&u, ACCESS, 1).unwrap();
        let claims = verify_token(&token, ACCESS, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, u.id);
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn authentication_yields_identity_only_for_access_tokens() {
        let u = user();
        let access = issue_access_token(&u, ACCESS, 1).unwrap();
        assert_eq!(authenticate_access_token(&access, ACCESS).unwrap().user_id(), u.id);

        let refresh = issue_refresh_token(&u, ACCESS, 24).unwrap();
        let err = authenticate_access_token(&refresh, ACCESS).unwrap_err();
        assert!(matches!(err, AuthError::WrongTokenKind { .. }));
    }

    #[test]
    fn access_token_rejected_where_refresh_expected() {
        let token = issue_access_token(&user(), ACCESS, 1).unwrap();
        let err = verify_token(&token, ACCESS, TokenKind::Refresh).unwrap_err();
        assert!(matches!(
            err,
            AuthError::WrongTokenKind {
                expected: TokenKind::Refresh,
                found: TokenKind::Access
            }
        ));
    }

    #[test]
    fn refresh_token_rejected_where_access_expected() {
        let token = issue_refresh_token(&user(), REFRESH, 24).unwrap();
        let err = verify_token(&token, REFRESH, TokenKind::Access).unwrap_err();
        assert!(matches!(err, AuthError::WrongTokenKind { .. }));
    }

    #[test]
    fn refresh_secret_cannot_verify_access_token() {
        let token = issue_access_token(&user(), ACCESS, 1).unwrap();
        let err = verify_token(&token, REFRESH, TokenKind::Access).unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[test]
    fn tampered_token_fails_signature() {
        let token = issue_access_token(&user(), ACCESS, 1).unwrap();
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let sig = parts[2].clone();
        let flipped = if sig.starts_with('A') { "B" } else { "A" };
        parts[2] = format!("{flipped}{}", &sig[1..]);
        let err = verify_token(&parts.join("."), ACCESS, TokenKind::Access).unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[test]
    fn garbage_token_fails_signature() {
        let err = verify_token("not.a.jwt", ACCESS, TokenKind::Access).unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
        let err = verify_token("", ACCESS, TokenKind::Access).unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[test]
    fn expiry_is_exact() {
        let issued = Utc::now() - TimeDelta::hours(3);
        let token = issue_token_at(TokenKind::Access, &user(), ACCESS, 2, issued).unwrap();

        let just_before = issued + TimeDelta::hours(2) - TimeDelta::seconds(1);
        assert!(verify_token_at(&token, ACCESS, TokenKind::Access, just_before).is_ok());

        let at_expiry = issued + TimeDelta::hours(2);
        let err = verify_token_at(&token, ACCESS, TokenKind::Access, at_expiry).unwrap_err();
        assert!(matches!(err, AuthError::Expired));

        let err = verify_token(&token, ACCESS, TokenKind::Access).unwrap_err();
        assert!(matches!(err, AuthError::Expired));
    }

    #[test]
    fn non_positive_ttl_is_invalid_configuration() {
        for ttl in [0, -1] {
            let err = issue_access_token(&user(), ACCESS, ttl).unwrap_err();
            assert!(matches!(err, AuthError::InvalidConfiguration(_)));
        }
        let err = issue_refresh_token(&user(), REFRESH, i64::MAX).unwrap_err();
        assert!(matches!(err, AuthError::InvalidConfiguration(_)));
    }

    #[test]
    fn empty_secret_is_signing_error() {
        let err = issue_access_token(&user(), b"", 1).unwrap_err();
        assert!(matches!(err, AuthError::Signing(_)));
    }

    #[test]
    fn tokens_issued_together_are_distinct() {
        let u = user();
        let a = issue_access_token(&u, ACCESS, 1).unwrap();
        let b = issue_access_token(&u, ACCESS, 1).unwrap();
        assert_ne!(a, b);
    }
}
