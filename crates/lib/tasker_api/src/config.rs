//! API server configuration.

use tasker_core::auth::AuthError;
use tasker_core::auth::jwt::resolve_token_secret;
use tasker_core::models::auth::TokenKind;
use tracing::warn;

/// Default access token lifetime in hours.
pub const DEFAULT_ACCESS_TOKEN_EXPIRY_HOUR: i64 = 2;

/// Default refresh token lifetime in hours (7 days).
pub const DEFAULT_REFRESH_TOKEN_EXPIRY_HOUR: i64 = 168;

/// Configuration for the API server.
#[derive(Clone)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3100").
    pub bind_addr: String,
    /// PostgreSQL connection URL. `None` runs on in-memory stores.
    pub database_url: Option<String>,
    /// Signing secret for access tokens.
    pub access_token_secret: String,
    /// Signing secret for refresh tokens. Must differ from the access secret.
    pub refresh_token_secret: String,
    pub access_token_ttl_hours: i64,
    pub refresh_token_ttl_hours: i64,
    /// Answer unknown-email logins with the same 401 as a wrong password.
    pub login_generic_errors: bool,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                    | Default                              |
    /// |-----------------------------|--------------------------------------|
    /// | `BIND_ADDR`                 | `127.0.0.1:3100`                     |
    /// | `DATABASE_URL`              | unset (in-memory stores)             |
    /// | `ACCESS_TOKEN_SECRET`       | generated & persisted to file        |
    /// | `REFRESH_TOKEN_SECRET`      | generated & persisted to file        |
    /// | `ACCESS_TOKEN_EXPIRY_HOUR`  | `2`                                  |
    /// | `REFRESH_TOKEN_EXPIRY_HOUR` | `168`                                |
    /// | `LOGIN_GENERIC_ERRORS`      | `false`                              |
    ///
    /// A token lifetime that is set but not an integer is an error rather than
    /// a silent fallback to the default.
    pub fn from_env() -> Result<Self, AuthError> {
        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3100".into()),
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.is_empty()),
            access_token_secret: resolve_token_secret(TokenKind::Access),
            refresh_token_secret: resolve_token_secret(TokenKind::Refresh),
            access_token_ttl_hours: env_hours(
                "ACCESS_TOKEN_EXPIRY_HOUR",
                DEFAULT_ACCESS_TOKEN_EXPIRY_HOUR,
            )?,
            refresh_token_ttl_hours: env_hours(
                "REFRESH_TOKEN_EXPIRY_HOUR",
                DEFAULT_REFRESH_TOKEN_EXPIRY_HOUR,
            )?,
            login_generic_errors: std::env::var("LOGIN_GENERIC_ERRORS")
                .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"))
                .unwrap_or(false),
        })
    }

    /// Reject configurations the token issuer could not honor.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.access_token_secret.is_empty() || self.refresh_token_secret.is_empty() {
            return Err(AuthError::InvalidConfiguration(
                "token secrets must not be empty".into(),
            ));
        }
        if self.access_token_secret == self.refresh_token_secret {
            return Err(AuthError::InvalidConfiguration(
                "access and refresh token secrets must differ".into(),
            ));
        }
        if self.access_token_ttl_hours <= 0 || self.refresh_token_ttl_hours <= 0 {
            return Err(AuthError::InvalidConfiguration(
                "token TTLs must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("access_token_secret", &"<redacted>")
            .field("refresh_token_secret", &"<redacted>")
            .field("access_token_ttl_hours", &self.access_token_ttl_hours)
            .field("refresh_token_ttl_hours", &self.refresh_token_ttl_hours)
            .field("login_generic_errors", &self.login_generic_errors)
            .finish()
    }
}

fn env_hours(var: &str, default: i64) -> Result<i64, AuthError> {
    parse_hours(var, std::env::var(var).ok().as_deref(), default)
}

/// Unset or blank falls back to `default`; anything else must parse.
fn parse_hours(var: &str, raw: Option<&str>, default: i64) -> Result<i64, AuthError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse().map_err(|_| {
            warn!(var, value, "token lifetime is not an integer");
            AuthError::InvalidConfiguration(format!("{var} must be an integer, got '{value}'"))
        }),
    }
}
