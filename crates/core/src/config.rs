//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the session issuer.
//! Nothing in this crate reads environment variables; binaries do that and hand the raw values
//! to the helpers here.

use crate::constants::{
    DEFAULT_SESSION_EXPIRY_MINUTES, MAX_SESSION_EXPIRY_MINUTES, MIN_SIGNING_SECRET_LEN,
};
use crate::{CoreError, CoreResult};
use chrono::Duration;
use std::fmt;
use telecare_types::NonEmptyText;

/// Shared secret the session signing key is derived from.
///
/// Read-only once constructed. The bytes never appear in `Debug` output.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Wraps a secret, rejecting anything shorter than the HS256 key size.
    pub fn new(secret: impl Into<Vec<u8>>) -> CoreResult<Self> {
        let secret = secret.into();
        if secret.len() < MIN_SIGNING_SECRET_LEN {
            return Err(CoreError::InvalidConfig(format!(
                "signing secret must be at least {MIN_SIGNING_SECRET_LEN} bytes"
            )));
        }
        Ok(Self(secret))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

/// Session credential configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    app_id: NonEmptyText,
    secret: SigningSecret,
    expiry: Duration,
}

impl SessionConfig {
    /// Create a new `SessionConfig`.
    ///
    /// # Arguments
    ///
    /// * `app_id` - Identifier of the issuing application, embedded in every credential.
    /// * `secret` - Shared signing secret; at least 32 bytes.
    /// * `expiry_minutes` - Credential lifetime, at most one day. Zero is accepted and yields
    ///   credentials that are already expired when issued.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if the application id is blank, the secret is too
    /// short, or the expiry window is negative or longer than one day.
    pub fn new(
        app_id: &str,
        secret: impl Into<Vec<u8>>,
        expiry_minutes: i64,
    ) -> CoreResult<Self> {
        let app_id = NonEmptyText::new(app_id)
            .map_err(|_| CoreError::InvalidConfig("app_id cannot be empty".into()))?;
        let secret = SigningSecret::new(secret)?;

        let expiry = Duration::minutes(check_expiry_minutes(expiry_minutes)?);

        Ok(Self {
            app_id,
            secret,
            expiry,
        })
    }

    pub fn app_id(&self) -> &str {
        self.app_id.as_str()
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    pub(crate) fn secret(&self) -> &SigningSecret {
        &self.secret
    }
}

/// Parse the session expiry window (minutes) from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the 30 minute default.
pub fn expiry_minutes_from_env_value(value: Option<String>) -> CoreResult<i64> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let Some(value) = value else {
        return Ok(DEFAULT_SESSION_EXPIRY_MINUTES);
    };

    let minutes = value.parse::<i64>().map_err(|_| {
        CoreError::InvalidConfig(format!("session expiry must be whole minutes, got '{value}'"))
    })?;
    check_expiry_minutes(minutes)
}

fn check_expiry_minutes(minutes: i64) -> CoreResult<i64> {
    if minutes < 0 {
        return Err(CoreError::InvalidConfig(
            "session expiry cannot be negative".into(),
        ));
    }
    if minutes > MAX_SESSION_EXPIRY_MINUTES {
        return Err(CoreError::InvalidConfig(format!(
            "session expiry cannot exceed {MAX_SESSION_EXPIRY_MINUTES} minutes"
        )));
    }
    Ok(minutes)
}
