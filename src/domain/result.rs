//! Result type alias for the SDK

use super::errors::SdkError;

/// Result type alias for SDK operations
///
/// # Examples
///
/// ```
/// use healthid_flow::domain::result::Result;
/// use healthid_flow::domain::errors::SdkError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SdkError::MalformedPayload("not an object".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SdkError>;
