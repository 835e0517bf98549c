//! Authentication service — signup/login/refresh flows delegating to
//! `tasker_core::auth` and the user directory.

use std::sync::LazyLock;

use tasker_core::auth::jwt::{issue_access_token, issue_refresh_token, verify_token};
use tasker_core::auth::password::{MAX_PASSWORD_BYTES, hash_password, verify_password};
use tasker_core::models::auth::{TokenKind, TokenPair};
use tasker_core::models::user::{NewUser, User};
use tasker_core::store::{StoreError, UserDirectory};
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};

/// Hash checked against when the login email is unknown, so both login
/// failure paths cost one bcrypt verification.
static DUMMY_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password("tasker-login-timing-equalizer").unwrap_or_default());

/// Build the dummy hash up front so the first unknown-email login does not
/// also pay for hashing it.
pub fn prime_login_timing() {
    LazyLock::force(&DUMMY_HASH);
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".into())
}

// ---------------------------------------------------------------------------
// Input validation
// ---------------------------------------------------------------------------

fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

fn validate_signup(name: &str, email: &str, password: &str) -> AppResult<()> {
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    if !is_valid_email(email) {
        return Err(AppError::Validation("A valid email is required".into()));
    }
    if password.is_empty() {
        return Err(AppError::Validation("Password is required".into()));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::Validation(format!(
            "Password must be at most {MAX_PASSWORD_BYTES} bytes"
        )));
    }
    Ok(())
}

fn validate_login(email: &str, password: &str) -> AppResult<()> {
    if email.is_empty() {
        return Err(AppError::Validation("Email is required".into()));
    }
    if password.is_empty() {
        return Err(AppError::Validation("Password is required".into()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Token pair issuance
// ---------------------------------------------------------------------------

/// Issue a fresh access + refresh pair for `user`.
///
/// Any failure here happens after the user exists, so it is a server-side
/// error; the account stays valid and the client can log in again.
fn issue_token_pair(user: &User, config: &ApiConfig) -> AppResult<TokenPair> {
    let access_token = issue_access_token(
        user,
        config.access_token_secret.as_bytes(),
        config.access_token_ttl_hours,
    )?;
    let refresh_token = issue_refresh_token(
        user,
        config.refresh_token_secret.as_bytes(),
        config.refresh_token_ttl_hours,
    )?;
    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

// ---------------------------------------------------------------------------
// Public auth operations
// ---------------------------------------------------------------------------

/// Register a new user and return its first token pair.
///
/// Email uniqueness is left to the directory: a duplicate surfaces as
/// `Conflict` straight from `UserDirectory::create`.
pub async fn signup(
    users: &dyn UserDirectory,
    config: &ApiConfig,
    name: &str,
    email: &str,
    password: &str,
) -> AppResult<TokenPair> {
    let (name, email) = (name.trim(), email.trim());
    validate_signup(name, email, password)?;

    let password_hash = hash_password(password)?;
    let user = users
        .create(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
        })
        .await?;
    info!(user_id = %user.id, "user signed up");

    issue_token_pair(&user, config).inspect_err(|e| {
        warn!(user_id = %user.id, error = %e, "token issuance failed after signup");
    })
}

/// Authenticate with email + password.
///
/// Unknown email is `NotFound` and a wrong password is `Unauthorized`, unless
/// `login_generic_errors` is set, in which case both are `Unauthorized`.
pub async fn login(
    users: &dyn UserDirectory,
    config: &ApiConfig,
    email: &str,
    password: &str,
) -> AppResult<TokenPair> {
    let email = email.trim();
    validate_login(email, password)?;

    let user = match users.get_by_email(email).await {
        Ok(user) => user,
        Err(StoreError::NotFound) => {
            let _ = verify_password(password, &DUMMY_HASH);
            return Err(if config.login_generic_errors {
                invalid_credentials()
            } else {
                AppError::NotFound("User not found with the given email".into())
            });
        }
        Err(e) => return Err(e.into()),
    };

    if !verify_password(password, &user.password_hash)? {
        return Err(invalid_credentials());
    }

    info!(user_id = %user.id, "user logged in");
    issue_token_pair(&user, config)
}

/// Exchange a valid refresh token for a new token pair.
pub async fn refresh(
    users: &dyn UserDirectory,
    config: &ApiConfig,
    refresh_token: &str,
) -> AppResult<TokenPair> {
    let claims = verify_token(
        refresh_token,
        config.refresh_token_secret.as_bytes(),
        TokenKind::Refresh,
    )?;

    let user = match users.get_by_id(claims.sub).await {
        Ok(user) => user,
        Err(StoreError::NotFound) => return Err(AppError::Unauthorized("Invalid token".into())),
        Err(e) => return Err(e.into()),
    };

    issue_token_pair(&user, config)
}
