//! Session configuration with builder pattern
//!
//! Credentials, TLS verification and timeout are fixed when a session is
//! created and apply to every call issued through it.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::api::error::ConfigError;

pub const DEFAULT_API_BASE_PATH: &str = "sap/c4c/api/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for one tenant
#[derive(Clone)]
pub struct SessionConfig {
    /// Full domain name of the tenant, e.g. `my1122334.de1.test.crm.cloud.sap`
    pub host: String,
    pub user: String,
    pub password: String,
    pub verify_ssl: bool,
    pub timeout: Duration,
    pub api_base_path: String,
    pub default_headers: BTreeMap<String, String>,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("verify_ssl", &self.verify_ssl)
            .field("timeout", &self.timeout)
            .field("api_base_path", &self.api_base_path)
            .field("default_headers", &self.default_headers)
            .finish()
    }
}

impl SessionConfig {
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            password: password.into(),
            verify_ssl: true,
            timeout: DEFAULT_TIMEOUT,
            api_base_path: DEFAULT_API_BASE_PATH.to_string(),
            default_headers: BTreeMap::new(),
        }
    }

    /// Create a new builder for SessionConfig
    pub fn builder(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> SessionConfigBuilder {
        SessionConfigBuilder::new(host, user, password)
    }

    /// Load settings from the environment (and a `.env` file, if present)
    ///
    /// Reads `SCV2_HOST`, `SCV2_USER`, `SCV2_PASSWORD` and the optional
    /// `SCV2_VERIFY_SSL`, `SCV2_TIMEOUT_SECS`, `SCV2_API_BASE_PATH`.
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("No .env file loaded: {}", e);
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("SCV2_HOST").context("SCV2_HOST is not set")?;
        let user = lookup("SCV2_USER").context("SCV2_USER is not set")?;
        let password = lookup("SCV2_PASSWORD").context("SCV2_PASSWORD is not set")?;

        let mut config = Self::new(host, user, password);

        if let Some(value) = lookup("SCV2_VERIFY_SSL") {
            config.verify_ssl = parse_bool(&value)
                .with_context(|| format!("Invalid SCV2_VERIFY_SSL value: {}", value))?;
        }

        if let Some(value) = lookup("SCV2_TIMEOUT_SECS") {
            let secs: u64 = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid SCV2_TIMEOUT_SECS value: {}", value))?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(value) = lookup("SCV2_API_BASE_PATH") {
            config.api_base_path = value;
        }

        config.validate().context("Invalid session configuration in environment")?;
        Ok(config)
    }

    /// Host non-empty, credentials present, positive timeout
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidSessionConfig(
                "Host cannot be empty".to_string(),
            ));
        }
        if self.user.is_empty() || self.password.is_empty() {
            return Err(ConfigError::InvalidSessionConfig(
                "User credentials cannot be empty".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidSessionConfig(
                "Timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// `https://{host}/{api_base_path}`, without a trailing slash
    pub fn base_url(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        let base_path = self.api_base_path.trim_matches('/');

        if base_path.is_empty() {
            format!("https://{}", host)
        } else {
            format!("https://{}/{}", host, base_path)
        }
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got '{}'", other),
    }
}

/// Builder for SessionConfig
#[derive(Debug)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            config: SessionConfig::new(host, user, password),
        }
    }

    /// Enable/disable TLS certificate verification
    pub fn verify_ssl(mut self, enabled: bool) -> Self {
        self.config.verify_ssl = enabled;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn api_base_path(mut self, path: impl Into<String>) -> Self {
        self.config.api_base_path = path.into();
        self
    }

    /// Header sent with every request
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(name.into(), value.into());
        self
    }

    pub fn build(self) -> SessionConfig {
        self.config
    }
}
