//! Remote step invocation
//!
//! The flow engine talks to the identity gateway only through [`StepInvoker`].
//! Whatever happens on the wire comes back as a [`StepOutcome`]; transport
//! failures are data at this layer, never errors.

use super::client::EhrClient;
use crate::core::payload::Payload;
use crate::domain::StepOutcome;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::time::Instant;

/// HTTP method of a remote step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issues one remote step call
#[async_trait]
pub trait StepInvoker: Send + Sync {
    /// Calls `endpoint` with the (already encrypted) request body
    ///
    /// Implementations must not fail: every transport or protocol problem is
    /// reported through [`StepOutcome::failed`].
    async fn invoke(&self, endpoint: &str, method: HttpMethod, body: &Payload) -> StepOutcome;
}

/// [`StepInvoker`] backed by the vendor REST API
#[derive(Debug, Clone)]
pub struct HttpStepInvoker {
    client: EhrClient,
}

impl HttpStepInvoker {
    pub fn new(client: EhrClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &EhrClient {
        &self.client
    }
}

#[async_trait]
impl StepInvoker for HttpStepInvoker {
    async fn invoke(&self, endpoint: &str, method: HttpMethod, body: &Payload) -> StepOutcome {
        let started = Instant::now();

        let result = match method {
            HttpMethod::Get => self.client.get_json(endpoint, &query_pairs(body)).await,
            HttpMethod::Post => {
                self.client
                    .post_json(endpoint, &Value::Object(body.clone()))
                    .await
            }
        };

        match result {
            Ok(response) => {
                tracing::debug!(
                    endpoint,
                    method = %method,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Remote step call succeeded"
                );
                StepOutcome::succeeded(response)
            }
            Err(e) => {
                tracing::warn!(
                    endpoint,
                    method = %method,
                    duration_ms = started.elapsed().as_millis() as u64,
                    error = %e,
                    "Remote step call failed"
                );
                StepOutcome::failed(e.to_string())
            }
        }
    }
}

/// Flattens a request body into query parameters
///
/// Strings are sent verbatim, other scalars as their JSON text, nested values
/// as compact JSON. Nulls are skipped.
pub fn query_pairs(body: &Payload) -> Vec<(String, String)> {
    body.iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), text))
        })
        .collect()
}
