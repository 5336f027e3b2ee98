//! Connection settings for an OpenL2M server.
//!
//! [`ServerConfig`] carries the base URL and API token plus the transport
//! knobs exposed by the server client. Values are checked with `validator`
//! on construction; the token is held as a [`SecretString`] so it never
//! shows up in `Debug` output or logs.

use crate::client::{ClientConfig, RetryPolicy, DEFAULT_TIMEOUT_SECS};
use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Environment variable holding the server base URL.
pub const ENV_URL: &str = "OPENL2M_URL";
/// Environment variable holding the API token.
pub const ENV_TOKEN: &str = "OPENL2M_TOKEN";
/// Environment variable toggling certificate verification (`false`/`0`/`no` disables).
pub const ENV_VERIFY_TLS: &str = "OPENL2M_VERIFY_TLS";
/// Environment variable overriding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "OPENL2M_TIMEOUT_SECS";

/// Configuration for one OpenL2M server connection.
#[derive(Debug, Validate)]
pub struct ServerConfig {
    /// Base URL of the OpenL2M instance, e.g. `https://openl2m.example.com/`
    #[validate(url)]
    url: String,

    /// API token
    token: SecretString,

    /// Whether to verify TLS certificates
    tls_verify: bool,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    request_timeout_secs: u64,

    /// Maximum number of retry attempts for GET requests
    #[validate(range(min = 0, max = 10))]
    max_retries: u32,
}

impl ServerConfig {
    /// Create a configuration from a base URL and token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the URL is empty, malformed or not
    /// `http`/`https`, or if the token is empty.
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            url: url.into().trim().to_string(),
            token: SecretString::from(token.into()),
            tls_verify: true,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: 0,
        };
        config.check()?;
        Ok(config)
    }

    /// Build a configuration from `OPENL2M_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if a required variable is missing or a
    /// value is invalid.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(ENV_URL)
            .ok_or_else(|| Error::ConfigError(format!("{ENV_URL} is not set")))?;
        let token = lookup(ENV_TOKEN)
            .ok_or_else(|| Error::ConfigError(format!("{ENV_TOKEN} is not set")))?;

        let mut config = Self::new(url, token)?;

        if let Some(verify) = lookup(ENV_VERIFY_TLS) {
            config.tls_verify = parse_flag(&verify).ok_or_else(|| {
                Error::ConfigError(format!("{ENV_VERIFY_TLS} must be a boolean, got `{verify}`"))
            })?;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            config.request_timeout_secs = timeout.trim().parse().map_err(|_| {
                Error::ConfigError(format!(
                    "{ENV_TIMEOUT_SECS} must be a number of seconds, got `{timeout}`"
                ))
            })?;
        }

        config.check()?;
        Ok(config)
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set maximum retry attempts.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// The base URL as given.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The API token.
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    /// Whether certificates are verified.
    #[must_use]
    pub const fn tls_verify(&self) -> bool {
        self.tls_verify
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Maximum retry attempts.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Parse the base URL, guaranteeing a trailing `/` so relative endpoints
    /// join below it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the URL is empty, cannot be parsed or
    /// uses a scheme other than `http`/`https`.
    pub fn parse_url(&self) -> Result<Url, Error> {
        parse_base_url(&self.url)
    }

    /// Derive the HTTP client settings.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        let retry = if self.max_retries == 0 {
            RetryPolicy::no_retry()
        } else {
            RetryPolicy::new().with_max_retries(self.max_retries)
        };
        ClientConfig::new()
            .with_timeout(self.timeout())
            .with_tls_verify(self.tls_verify)
            .with_retry_policy(retry)
    }

    /// Validate all fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first problem found.
    pub fn check(&self) -> Result<(), Error> {
        if self.url.is_empty() {
            return Err(Error::ConfigError("base URL must not be empty".to_string()));
        }
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;
        if self.token.expose_secret().trim().is_empty() {
            return Err(Error::ConfigError("API token must not be empty".to_string()));
        }
        self.parse_url().map(|_| ())
    }
}

/// Parse and normalize an OpenL2M base URL.
///
/// # Errors
///
/// Returns [`Error::ConfigError`] if the URL is empty, malformed, not
/// `http`/`https` or carries a username or password.
pub fn parse_base_url(raw: &str) -> Result<Url, Error> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::ConfigError("base URL must not be empty".to_string()));
    }

    let mut url =
        Url::parse(raw).map_err(|e| Error::ConfigError(format!("Invalid base URL `{raw}`: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::ConfigError(format!(
            "Unsupported URL scheme `{}` in `{raw}`",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(Error::ConfigError(format!("Base URL `{raw}` has no host")));
    }
    // reqwest sends userinfo as a Basic auth header.
    if !url.username().is_empty() || url.password().is_some() {
        return Err(Error::ConfigError(
            "Base URL must not contain a username or password".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
