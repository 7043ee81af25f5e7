//! Sensitive-field encryption policy
//!
//! Which payload keys get encrypted is decided by a lookup table evaluated per
//! request body, plus any step-specific fields listed in the flow table.

use super::payload::{scalar_text, Payload};
use crate::adapters::encryption::Encryptor;
use crate::domain::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Field name → encrypt? lookup table
#[derive(Debug, Clone)]
pub struct SensitiveFields {
    fields: HashMap<String, bool>,
}

impl SensitiveFields {
    /// An empty table; nothing is encrypted
    pub fn none() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Adds or overrides one entry
    pub fn with_field(mut self, field: impl Into<String>, encrypt: bool) -> Self {
        self.fields.insert(field.into(), encrypt);
        self
    }

    pub fn should_encrypt(&self, field: &str) -> bool {
        self.fields.get(field).copied().unwrap_or(false)
    }
}

impl Default for SensitiveFields {
    fn default() -> Self {
        Self::none().with_field("aadhaar", true).with_field("otp", true)
    }
}

/// Applies the sensitive-field policy to outgoing request bodies
#[derive(Clone)]
pub struct FieldEncryptor {
    encryptor: Arc<dyn Encryptor>,
    sensitive: SensitiveFields,
}

impl FieldEncryptor {
    /// Uses the default table (`aadhaar`, `otp`)
    pub fn new(encryptor: Arc<dyn Encryptor>) -> Self {
        Self::with_fields(encryptor, SensitiveFields::default())
    }

    pub fn with_fields(encryptor: Arc<dyn Encryptor>, sensitive: SensitiveFields) -> Self {
        Self {
            encryptor,
            sensitive,
        }
    }

    /// Replaces every sensitive value in `body` with its encrypted form
    ///
    /// A field is sensitive when the lookup table says so or when it appears in
    /// `step_fields`. Absent, `null` and blank values are left untouched;
    /// numbers and booleans are encrypted as their text.
    ///
    /// # Errors
    ///
    /// Propagates the first encryption failure.
    pub fn encrypt_sensitive_fields(
        &self,
        mut body: Payload,
        step_fields: &[&str],
    ) -> Result<Payload> {
        let targets: Vec<String> = body
            .keys()
            .filter(|key| self.sensitive.should_encrypt(key) || step_fields.contains(&key.as_str()))
            .cloned()
            .collect();

        for key in targets {
            let Some(plaintext) = body
                .get(&key)
                .and_then(scalar_text)
                .filter(|s| !s.trim().is_empty())
            else {
                continue;
            };

            let ciphertext = self.encryptor.encrypt(plaintext.trim())?;
            tracing::debug!(field = %key, "Encrypted sensitive field");
            body.insert(key, Value::String(ciphertext));
        }

        Ok(body)
    }
}

impl std::fmt::Debug for FieldEncryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldEncryptor")
            .field("sensitive", &self.sensitive)
            .finish_non_exhaustive()
    }
}
