//! Configuration schema types
//!
//! Maps one-to-one onto the sections of `healthid.toml`.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Identity gateway connection
    pub ehr: EhrApiConfig,

    /// Public key used to encrypt sensitive fields
    pub encryption: EncryptionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SdkConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.ehr.validate(&self.environment)?;
        self.encryption.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Identity gateway (EHR vendor API) connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EhrApiConfig {
    /// Base URL every step endpoint is resolved against
    pub base_url: String,

    /// Bearer token sent as `Authorization`
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Client identifier sent as `X-Client-Id`
    #[serde(default)]
    pub client_id: Option<String>,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,

    /// TLS certificate verification enabled
    ///
    /// **SECURITY WARNING**: Disabling TLS verification exposes Aadhaar-derived
    /// data to man-in-the-middle attacks. Rejected in production.
    #[serde(default = "default_true")]
    pub tls_verify: bool,
}

impl EhrApiConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("ehr.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("ehr.base_url must start with http:// or https://".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("ehr.timeout_seconds must be > 0".to_string());
        }

        if self.connect_timeout_seconds == 0 {
            return Err("ehr.connect_timeout_seconds must be > 0".to_string());
        }

        if *environment == Environment::Production && !self.tls_verify {
            return Err(
                "TLS certificate verification cannot be disabled in production environments. \
                Set 'tls_verify = true' or use environment = \"development\" or \"staging\"."
                    .to_string(),
            );
        }

        Ok(())
    }
}

impl Default for EhrApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/v1".to_string(),
            api_key: None,
            client_id: None,
            timeout_seconds: default_timeout_seconds(),
            connect_timeout_seconds: default_connect_timeout_seconds(),
            tls_verify: true,
        }
    }
}

/// Source of the identity gateway's public key
///
/// Exactly one of `public_key_path` and `public_key_pem` must be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncryptionConfig {
    /// Path to a PEM file (SPKI or PKCS#1)
    #[serde(default)]
    pub public_key_path: Option<String>,

    /// Inline PEM text
    #[serde(default)]
    pub public_key_pem: Option<String>,
}

impl EncryptionConfig {
    fn validate(&self) -> Result<(), String> {
        let set = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());

        match (set(&self.public_key_path), set(&self.public_key_pem)) {
            (true, false) | (false, true) => Ok(()),
            (true, true) => Err(
                "Set only one of encryption.public_key_path and encryption.public_key_pem"
                    .to_string(),
            ),
            (false, false) => Err(
                "encryption.public_key_path or encryption.public_key_pem is required".to_string(),
            ),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled = true".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_connect_timeout_seconds() -> u64 {
    10
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
