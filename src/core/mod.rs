//! Core registration logic.
//!
//! # Modules
//!
//! - [`payload`] - Normalization of caller input into a key/value map
//! - [`validation`] - Declarative field rules and the validator
//! - [`requests`] - Typed request shapes, one per step payload
//! - [`encryption`] - Sensitive-field encryption policy
//! - [`flow`] - The generic state machine and the ABHA/HPR transition tables
//! - [`client`] - [`HealthIdClient`], the facade over both flows
//!
//! # Step Workflow
//!
//! Every dispatched step runs the same pipeline:
//!
//! 1. **Normalize**: turn the caller's payload into a key/value map
//! 2. **Validate**: check it against the step's request shape
//! 3. **Encrypt**: replace sensitive values with their ciphertext
//! 4. **Invoke**: call the step's remote endpoint
//! 5. **Transition**: pick the next step from the response
//!
//! # Example
//!
//! ```rust,no_run
//! use healthid_flow::core::HealthIdClient;
//! use healthid_flow::config::load_config;
//! use healthid_flow::domain::AbhaStep;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HealthIdClient::new(&load_config("healthid.toml")?)?;
//!
//! let sent = client
//!     .abha()
//!     .dispatch(AbhaStep::RegisterWithAadhaar, json!({"aadhaar": "123456789012"}))
//!     .await;
//!
//! let txn_id = sent.response_value(&["txnId"]).cloned();
//! let verified = client
//!     .abha()
//!     .dispatch(
//!         AbhaStep::VerifyAadhaarOtp,
//!         json!({"otp": "123456", "txnId": txn_id, "mobile": "9876543210"}),
//!     )
//!     .await;
//! println!("{}", verified.message);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod encryption;
pub mod flow;
pub mod payload;
pub mod requests;
pub mod validation;

pub use client::HealthIdClient;
pub use flow::RegistrationFlow;
pub use payload::{normalize, Payload, RawPayload};
