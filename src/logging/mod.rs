//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output filtered by `RUST_LOG` or the configured level
//! - JSON-formatted local log files with rotation
//! - Step-level macros that keep field names consistent across flows
//!
//! Payload values are never passed to these macros; only flow, step, endpoint
//! and outcome metadata are logged.
//!
//! # Example
//!
//! ```no_run
//! use healthid_flow::logging::init_logging;
//! use healthid_flow::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the dispatch of a registration step
///
/// # Example
///
/// ```no_run
/// use healthid_flow::log_step_dispatch;
///
/// log_step_dispatch!("abha", "register_with_aadhaar", "abha/aadhaar/generate-otp");
/// ```
#[macro_export]
macro_rules! log_step_dispatch {
    ($flow:expr, $step:expr, $endpoint:expr) => {
        tracing::info!(
            flow = %$flow,
            step = %$step,
            endpoint = $endpoint,
            "Dispatching registration step"
        );
    };
}

/// Log the transition chosen after a successful step
///
/// # Example
///
/// ```no_run
/// use healthid_flow::log_step_transition;
///
/// log_step_transition!("abha", "verify_aadhaar_otp", Some("update_mobile"));
/// ```
#[macro_export]
macro_rules! log_step_transition {
    ($flow:expr, $step:expr, $next:expr) => {
        tracing::info!(
            flow = %$flow,
            step = %$step,
            next_step = $next.unwrap_or("<terminal>"),
            "Registration step completed"
        );
    };
}

/// Log a step that ended in a failed result
///
/// # Example
///
/// ```no_run
/// use healthid_flow::log_step_failure;
///
/// log_step_failure!("hpr", "create_hpr", "Failed to create HPR ID: HTTP 409");
/// ```
#[macro_export]
macro_rules! log_step_failure {
    ($flow:expr, $step:expr, $message:expr) => {
        tracing::warn!(
            flow = %$flow,
            step = %$step,
            message = %$message,
            "Registration step failed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use healthid_flow::log_error_with_context;
/// use healthid_flow::domain::SdkError;
///
/// let error = SdkError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
