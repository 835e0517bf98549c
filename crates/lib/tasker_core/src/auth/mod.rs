//! Authentication and authorization primitives.
//!
//! Password hashing, access/refresh token issuance and verification, and the
//! [`Identity`] that a verified access token resolves to.

pub mod jwt;
pub mod password;

use thiserror::Error;

use crate::models::auth::{TokenClaims, TokenKind};
use crate::models::user::UserId;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("Password longer than {0} bytes")]
    PasswordTooLong(usize),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Wrong token kind: expected {expected}, got {found}")]
    WrongTokenKind { expected: TokenKind, found: TokenKind },

    #[error("Token expired")]
    Expired,
}

/// The authenticated caller of a request.
///
/// Only obtainable through [`jwt::authenticate_access_token`], and lives for a
/// single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    user_id: UserId,
}

impl Identity {
    /// Resolve the caller from claims that already passed verification.
    pub(crate) fn from_claims(claims: &TokenClaims) -> Self {
        Self {
            user_id: claims.sub,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[cfg(test)]
    pub(crate) fn for_user(user_id: UserId) -> Self {
        Self { user_id }
    }
}
