//! Configuration loading and validation for the sealing service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use std::time::Duration;

use anyhow::{Context, Result};
use gencrypt::{Galois, Mode, SecretKey};
use serde::{Deserialize, Deserializer};
use zeroize::Zeroizing;

use crate::server::middleware::{self, Limits};

/// Validated service configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Standard-base64 AES key (16, 24 or 32 bytes once decoded). **Required.**
    /// Wiped from memory when the config is dropped.
    #[serde(deserialize_with = "deserialize_secret")]
    pub gencrypt_key: Zeroizing<String>,

    /// Authenticated mode: `aes-gcm` or `aes-gcm-siv`.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Largest accepted request body, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn deserialize_secret<'de, D: Deserializer<'de>>(d: D) -> Result<Zeroizing<String>, D::Error> {
    String::deserialize(d).map(Zeroizing::new)
}

fn default_algorithm() -> String {
    Mode::default().as_str().into()
}
fn default_listen_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    middleware::DEFAULT_REQUEST_TIMEOUT.as_secs()
}
fn default_max_body_bytes() -> usize {
    middleware::DEFAULT_MAX_BODY_BYTES
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Parsed [`Mode`] from the `ALGORITHM` variable.
    pub fn mode(&self) -> Result<Mode> {
        self.algorithm.parse().with_context(|| {
            format!(
                "ALGORITHM must be one of aes-gcm, aes-gcm-siv (got {:?})",
                self.algorithm
            )
        })
    }

    /// Decode the key and build the cipher handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not base64 or its length does not fit
    /// the configured mode.
    pub fn build_cipher(&self) -> Result<Galois> {
        let key =
            SecretKey::from_base64(&self.gencrypt_key).context("GENCRYPT_KEY is invalid")?;
        Galois::with_mode(self.mode()?, key.as_bytes())
            .context("GENCRYPT_KEY does not fit ALGORITHM")
    }

    pub fn limits(&self) -> Limits {
        Limits {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_body_bytes: self.max_body_bytes,
        }
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.gencrypt_key.trim().is_empty() {
            anyhow::bail!("GENCRYPT_KEY is required and must not be empty");
        }
        self.mode()?;
        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be > 0");
        }
        if self.max_body_bytes == 0 {
            anyhow::bail!("MAX_BODY_BYTES must be > 0");
        }
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("gencrypt_key", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .field("listen_port", &self.listen_port)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("log_level", &self.log_level)
            .finish()
    }
}
