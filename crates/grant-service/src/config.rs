use secrecy::SecretString;
use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Default grant validity window (one hour).
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

/// Grant service configuration.
///
/// The signing secret is held as a [`SecretString`]: Debug output redacts
/// it and the backing memory is zeroized on drop.
#[derive(Debug, Clone)]
pub struct GrantConfig {
    /// Stable identifier of the issuing tenant.
    pub app_id: String,

    /// Shared secret keying the token signature.
    pub signing_secret: SecretString,

    /// Default validity window applied when a request carries no TTL.
    pub token_ttl_secs: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

impl GrantConfig {
    /// Build a configuration directly, using the default TTL.
    #[must_use]
    pub fn new(app_id: impl Into<String>, signing_secret: SecretString) -> Self {
        Self {
            app_id: app_id.into(),
            signing_secret,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a required variable is missing or a value
    /// fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a map (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a required variable is missing or a value
    /// fails validation.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let app_id = vars
            .get("GRANT_APP_ID")
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("GRANT_APP_ID".to_string()))?
            .clone();

        let signing_secret = vars
            .get("GRANT_SIGNING_SECRET")
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("GRANT_SIGNING_SECRET".to_string()))?;

        let token_ttl_secs = match vars.get("GRANT_TOKEN_TTL_SECS") {
            Some(raw) => {
                let parsed: u64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
                    name: "GRANT_TOKEN_TTL_SECS",
                    reason: format!("not an unsigned integer: {raw}"),
                })?;
                if parsed == 0 {
                    return Err(ConfigError::InvalidValue {
                        name: "GRANT_TOKEN_TTL_SECS",
                        reason: "must be positive".to_string(),
                    });
                }
                parsed
            }
            None => DEFAULT_TOKEN_TTL_SECS,
        };

        Ok(GrantConfig {
            app_id,
            signing_secret: SecretString::from(signing_secret.as_str()),
            token_ttl_secs,
        })
    }
}
