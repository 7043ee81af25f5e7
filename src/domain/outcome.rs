//! Result envelopes
//!
//! [`StepOutcome`] is what a remote step invocation produces, whatever happened
//! on the wire. [`FlowResult`] is what a caller of the flow engine receives.

use super::step::FlowStep;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized envelope of one remote step call
///
/// Exactly one of `response` / `error` is set, gated by `success`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    success: bool,
    #[serde(default)]
    response: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

impl StepOutcome {
    /// Successful call with its decoded response body
    pub fn succeeded(response: Value) -> Self {
        Self {
            success: true,
            response: Some(response),
            error: None,
        }
    }

    /// Failed call with a description of the failure
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Decoded response body (only on success)
    pub fn response(&self) -> Option<&Value> {
        self.response.as_ref()
    }

    /// Failure description (only on failure)
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Serializes the envelope into the `data` field of a [`FlowResult`]
    pub fn to_value(&self) -> Value {
        let mut envelope = serde_json::Map::new();
        envelope.insert("success".to_string(), Value::Bool(self.success));
        if let Some(response) = &self.response {
            envelope.insert("response".to_string(), response.clone());
        }
        if let Some(error) = &self.error {
            envelope.insert("error".to_string(), Value::String(error.clone()));
        }
        Value::Object(envelope)
    }
}

/// Result of one dispatched registration step
///
/// `next_step` is `None` when the flow reached a terminal step or the step
/// failed. `data` and `error` are mutually exclusive: `data` carries the remote
/// envelope on success, `error` repeats the failure message otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowResult {
    pub message: String,
    pub data: Option<Value>,
    pub next_step: Option<String>,
    pub next_step_hint: Option<String>,
    pub next_step_payload_shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FlowResult {
    /// A completed step with no next step
    pub fn terminal(message: impl Into<String>, data: Value) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            next_step: None,
            next_step_hint: None,
            next_step_payload_shape: None,
            error: None,
        }
    }

    /// A completed step that hands over to `next`
    pub fn advance<S: FlowStep>(
        message: impl Into<String>,
        data: Value,
        next: S,
        hint: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            next_step: Some(next.name().to_string()),
            next_step_hint: Some(hint.into()),
            next_step_payload_shape: Some(next.payload_shape().to_string()),
            error: None,
        }
    }

    /// A failed step
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            error: Some(message.clone()),
            message,
            data: None,
            next_step: None,
            next_step_hint: None,
            next_step_payload_shape: None,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// Resolves `next_step` back into a typed step of flow `S`
    pub fn next<S: FlowStep>(&self) -> Option<S> {
        self.next_step.as_deref().and_then(S::resolve)
    }

    /// Looks up a value inside the remote response carried in `data`
    pub fn response_value(&self, path: &[&str]) -> Option<&Value> {
        let mut current = self.data.as_ref()?.get("response")?;
        for segment in path {
            current = current.get(*segment)?;
        }
        Some(current)
    }
}
