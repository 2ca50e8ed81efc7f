//! Application configuration.

use std::{env, time::Duration};

use thiserror::Error;

/// Environment variable naming the document database base URL.
pub const STORE_URL_VAR: &str = "HEMLINE_STORE_URL";

/// Environment variable carrying the optional database credential.
pub const STORE_AUTH_TOKEN_VAR: &str = "HEMLINE_STORE_AUTH_TOKEN";

/// Environment variable overriding the store request timeout, in seconds.
pub const STORE_TIMEOUT_VAR: &str = "HEMLINE_STORE_TIMEOUT_SECS";

/// Request timeout applied when none is configured.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("HEMLINE_STORE_URL is not set")]
    MissingStoreUrl,

    #[error("HEMLINE_STORE_TIMEOUT_SECS is not a whole number of seconds")]
    InvalidTimeout(#[source] std::num::ParseIntError),
}

/// Backend connection settings, read from the environment.
///
/// Only the store connection is configurable; everything else in the
/// storefront is code.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Document database base URL.
    pub store_url: String,

    /// Optional database credential.
    pub store_auth_token: Option<String>,

    /// Per-request timeout for store calls.
    pub store_timeout: Duration,
}

impl AppConfig {
    /// Loads configuration from the environment, honouring a `.env` file
    /// when one is present.
    ///
    /// # Errors
    ///
    /// Returns an error when the store URL is missing or the timeout
    /// override does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _env = dotenvy::dotenv();

        Self::from_vars(
            env::var(STORE_URL_VAR).ok(),
            env::var(STORE_AUTH_TOKEN_VAR).ok(),
            env::var(STORE_TIMEOUT_VAR).ok(),
        )
    }

    fn from_vars(
        store_url: Option<String>,
        store_auth_token: Option<String>,
        store_timeout: Option<String>,
    ) -> Result<Self, ConfigError> {
        let store_url = store_url
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingStoreUrl)?;

        let store_timeout = match store_timeout {
            Some(raw) => {
                Duration::from_secs(raw.trim().parse().map_err(ConfigError::InvalidTimeout)?)
            }
            None => DEFAULT_STORE_TIMEOUT,
        };

        Ok(Self {
            store_url,
            store_auth_token,
            store_timeout,
        })
    }
}
