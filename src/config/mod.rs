//! Configuration management.
//!
//! TOML-based configuration with:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `HEALTHID_*` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use healthid_flow::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("healthid.toml")?;
//! println!("Gateway: {}", config.ehr.base_url);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`Environment`] - development, staging or production
//! - [`EhrApiConfig`] - Gateway URL, credentials, timeouts and TLS
//! - [`EncryptionConfig`] - Public key used for sensitive fields
//! - [`LoggingConfig`] - Local JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "staging"
//!
//! [application]
//! log_level = "info"
//!
//! [ehr]
//! base_url = "https://gateway.example.com/api/v3"
//! api_key = "${HEALTHID_API_KEY}"
//! client_id = "hospital-42"
//!
//! [encryption]
//! public_key_path = "keys/gateway-public.pem"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, EhrApiConfig, EncryptionConfig, Environment, LoggingConfig, SdkConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
