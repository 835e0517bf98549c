//! Password hashing via bcrypt.
//!
//! Every call to [`hash_password`] draws a fresh random salt, so hashing the
//! same plaintext twice yields two different strings that both verify.
//!
//! Passwords are never truncated: anything past [`MAX_PASSWORD_BYTES`] is
//! refused at hashing time instead of being silently cut to bcrypt's block.

use bcrypt::BcryptError;

use super::AuthError;

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Longest password bcrypt digests in full (72 bytes including its NUL
/// terminator).
pub const MAX_PASSWORD_BYTES: usize = 71;

/// Hash a password with bcrypt (cost 10).
///
/// Fails with [`AuthError::PasswordTooLong`] past [`MAX_PASSWORD_BYTES`].
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::non_truncating_hash(password, BCRYPT_COST).map_err(|e| match e {
        BcryptError::Truncation(_) => AuthError::PasswordTooLong(MAX_PASSWORD_BYTES),
        e => AuthError::Hashing(format!("bcrypt hash: {e}")),
    })
}

/// Verify a password against a bcrypt hash.
///
/// A mismatch is `Ok(false)`, and so is an over-long password, since no stored
/// hash was produced from one. Only an unparseable stored hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    match bcrypt::non_truncating_verify(password, hash) {
        Ok(matched) => Ok(matched),
        Err(BcryptError::Truncation(_)) => Ok(false),
        Err(e) => Err(AuthError::Hashing(format!("bcrypt verify: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_accepts_same_password() {
        let hash = hash_password("pw123").unwrap();
        assert!(verify_password("pw123", &hash).unwrap());
    }

    #[test]
    fn wrong_password_is_false_not_error() {
        let hash = hash_password("pw123").unwrap();
        assert!(!verify_password("pw124", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password("correct-horse").unwrap();
        let b = hash_password("correct-horse").unwrap();
        assert_ne!(a, b, "salt must differ per call");
        assert!(verify_password("correct-horse", &a).unwrap());
        assert!(verify_password("correct-horse", &b).unwrap());
    }

    #[test]
    fn hash_never_contains_plaintext() {
        let hash = hash_password("super-secret-value").unwrap();
        assert!(!hash.contains("super-secret-value"));
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn passwords_sharing_a_long_prefix_do_not_cross_verify() {
        let prefix = "a".repeat(MAX_PASSWORD_BYTES - 1);
        let hash = hash_password(&format!("{prefix}x")).unwrap();
        assert!(!verify_password(&format!("{prefix}y"), &hash).unwrap());
        assert!(!verify_password(&format!("{prefix}x-and-more"), &hash).unwrap());
        assert!(verify_password(&format!("{prefix}x"), &hash).unwrap());
    }

    #[test]
    fn over_long_password_is_refused_not_truncated() {
        let long = "a".repeat(MAX_PASSWORD_BYTES + 1);
        let err = hash_password(&long).unwrap_err();
        assert!(matches!(err, AuthError::PasswordTooLong(MAX_PASSWORD_BYTES)));

        let limit = "é".repeat(MAX_PASSWORD_BYTES / 2);
        assert!(hash_password(&limit).is_ok());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let err = verify_password("pw", "not-a-bcrypt-hash").unwrap_err();
        assert!(matches!(err, AuthError::Hashing(_)));
    }
}
