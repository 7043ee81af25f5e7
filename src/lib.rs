// HealthID Flow - ABHA and HPR registration client
// Copyright (c) 2025 HealthID Flow Contributors
// Licensed under the MIT License

//! # HealthID Flow
//!
//! Client-side state machine for the two health-identity registrations of the
//! Indian digital health stack:
//!
//! - **ABHA**: a patient's Ayushman Bharat Health Account
//! - **HPR**: a practitioner's Healthcare Professional Registry ID
//!
//! Each registration is a sequence of steps (Aadhaar OTP, mobile checks,
//! address or ID selection). The caller runs one step at a time; every result
//! says which step comes next and what its payload must contain.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Payload validation, the flow engine and the client facade
//! - [`adapters`] - Gateway HTTP client and RSA field encryption
//! - [`domain`] - Steps, result envelopes and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use healthid_flow::config::load_config;
//! use healthid_flow::core::HealthIdClient;
//! use healthid_flow::domain::{AbhaStep, FlowStep};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("healthid.toml")?;
//!     let client = HealthIdClient::new(&config)?;
//!
//!     let result = client
//!         .abha()
//!         .dispatch(AbhaStep::RegisterWithAadhaar, json!({"aadhaar": "123456789012"}))
//!         .await;
//!
//!     match result.next::<AbhaStep>() {
//!         Some(next) => println!("next: {} ({})", next.name(), result.next_step_hint.unwrap_or_default()),
//!         None => println!("{}", result.message),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Lower layers return [`domain::SdkError`]. The flow engine never returns an
//! error: validation failures, remote rejections and internal faults all come
//! back as a [`domain::FlowResult`] with `next_step == None` and `error` set.
//!
//! ```rust
//! use healthid_flow::domain::FlowResult;
//!
//! let failed = FlowResult::failure("Validation failed: aadhaar: must be exactly 12 digits");
//! assert!(failed.is_failure());
//! assert!(failed.next_step.is_none());
//! ```
//!
//! ## Logging
//!
//! Structured logging with the `tracing` crate. Only field names and step
//! metadata are logged, never Aadhaar numbers, OTPs or mobile numbers.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
