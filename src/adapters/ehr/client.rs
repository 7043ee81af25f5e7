//! EHR vendor HTTP client
//!
//! Thin wrapper around `reqwest` that knows the vendor base URL, the
//! authentication headers and the per-request tracing headers the identity
//! gateway expects.

use crate::config::{EhrApiConfig, SecretString};
use crate::domain::{Result, SdkError};
use chrono::{SecondsFormat, Utc};
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

/// HTTP client for the EHR vendor API
///
/// # Example
///
/// ```no_run
/// use healthid_flow::adapters::ehr::EhrClient;
/// use healthid_flow::config::EhrApiConfig;
///
/// # async fn example() -> healthid_flow::domain::Result<()> {
/// let config = EhrApiConfig::default();
/// let client = EhrClient::new(&config)?;
/// let body = client.get_json("abha/address/suggestions", &[("txnId".into(), "t1".into())]).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EhrClient {
    base_url: Url,
    http: Client,
    api_key: Option<SecretString>,
    client_id: Option<String>,
}

impl EhrClient {
    /// Creates a client from the `[ehr]` configuration section
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(config: &EhrApiConfig) -> Result<Self> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            SdkError::Configuration(format!("Invalid ehr.base_url '{}': {e}", config.base_url))
        })?;

        let mut builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds));

        if !config.tls_verify {
            tracing::warn!("TLS certificate verification is disabled for the EHR API");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder
            .build()
            .map_err(|e| SdkError::Connection(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            http,
            api_key: config.api_key.clone(),
            client_id: config.client_id.clone(),
        })
    }

    /// Base URL every endpoint path is resolved against
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Resolves an endpoint path against the base URL
    pub fn endpoint_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| SdkError::Configuration(format!("Invalid endpoint path '{path}': {e}")))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut request = self
            .http
            .request(method, url)
            .header("Accept", "application/json")
            .header("REQUEST-ID", Uuid::new_v4().to_string())
            .header(
                "TIMESTAMP",
                Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            );

        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }
        if let Some(client_id) = &self.client_id {
            request = request.header("X-Client-Id", client_id);
        }

        request
    }

    /// GET with query parameters, decoding a JSON response
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Connection`] on transport failure, [`SdkError::Http`]
    /// on a non-2xx status and [`SdkError::Serialization`] for an undecodable body.
    pub async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        let url = self.endpoint_url(path)?;
        let resp = self
            .request(Method::GET, url)
            .query(query)
            .send()
            .await
            .map_err(|e| SdkError::Connection(e.to_string()))?;
        handle_response(resp).await
    }

    /// POST a JSON body, decoding a JSON response
    ///
    /// # Errors
    ///
    /// Same as [`EhrClient::get_json`].
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.endpoint_url(path)?;
        let resp = self
            .request(Method::POST, url)
            .json(body)
            .send()
            .await
            .map_err(|e| SdkError::Connection(e.to_string()))?;
        handle_response(resp).await
    }
}

async fn handle_response(resp: Response) -> Result<Value> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| SdkError::Connection(format!("Failed to read response body: {e}")))?;

    if !status.is_success() {
        return Err(SdkError::Http {
            status: status.as_u16(),
            message: remote_error_text(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string()),
        });
    }

    if body.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    serde_json::from_str(&body)
        .map_err(|e| SdkError::Serialization(format!("Invalid JSON response: {e}")))
}

/// Extracts the most useful error text from a failed response body
fn remote_error_text(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(json) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error", "details", "errorDetails"] {
            match json.get(key) {
                Some(Value::String(text)) if !text.is_empty() => return Some(text.clone()),
                Some(Value::Object(inner)) => {
                    if let Some(Value::String(text)) = inner.get("message") {
                        return Some(text.clone());
                    }
                }
                Some(Value::Array(items)) => {
                    let messages: Vec<&str> = items
                        .iter()
                        .filter_map(|i| i.get("message").and_then(Value::as_str))
                        .collect();
                    if !messages.is_empty() {
                        return Some(messages.join("; "));
                    }
                }
                _ => {}
            }
        }
    }

    Some(body.to_string())
}

impl std::fmt::Debug for EhrClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EhrClient")
            .field("base_url", &self.base_url.as_str())
            .field("client_id", &self.client_id)
            .field("authenticated", &self.api_key.is_some())
            .finish()
    }
}
