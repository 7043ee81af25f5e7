//! External system integrations.
//!
//! - [`ehr`] - Identity gateway REST client and the remote step invoker
//! - [`encryption`] - Public-key encryption of sensitive field values
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits ([`ehr::StepInvoker`],
//! [`encryption::Encryptor`]) so the flow engine can be exercised with stub
//! implementations.
//!
//! ```rust,no_run
//! use healthid_flow::adapters::ehr::{EhrClient, HttpStepInvoker};
//! use healthid_flow::config::{secret_string, EhrApiConfig};
//!
//! # fn example() -> healthid_flow::domain::Result<()> {
//! let config = EhrApiConfig {
//!     base_url: "https://gateway.example.com/api/v3".to_string(),
//!     api_key: Some(secret_string("token".to_string())),
//!     ..Default::default()
//! };
//!
//! let invoker = HttpStepInvoker::new(EhrClient::new(&config)?);
//! # Ok(())
//! # }
//! ```

pub mod ehr;
pub mod encryption;
