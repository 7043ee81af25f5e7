//! Domain models and types.
//!
//! The domain layer provides:
//! - **Flow steps** ([`AbhaStep`], [`HprStep`]) and the [`FlowStep`] trait the engine is generic over
//! - **Result envelopes** ([`StepOutcome`] for remote calls, [`FlowResult`] for callers)
//! - **Error types** ([`SdkError`], [`ValidationErrors`])
//! - **Result type alias** ([`Result`])
//!
//! # Step aliases
//!
//! ```rust
//! use healthid_flow::domain::{AbhaStep, FlowStep};
//!
//! assert_eq!(AbhaStep::resolve("1"), Some(AbhaStep::RegisterWithAadhaar));
//! assert_eq!(AbhaStep::resolve("VERIFY_AADHAAR_OTP"), Some(AbhaStep::VerifyAadhaarOtp));
//! assert_eq!(AbhaStep::resolve("99"), None);
//! ```

pub mod errors;
pub mod outcome;
pub mod result;
pub mod step;

// Re-export commonly used types for convenience
pub use errors::{FieldError, SdkError, ValidationErrors};
pub use outcome::{FlowResult, StepOutcome};
pub use result::Result;
pub use step::{AbhaStep, FlowKind, FlowStep, HprStep};
