//! Client facade over both registration flows

use super::encryption::FieldEncryptor;
use super::flow::RegistrationFlow;
use super::payload::RawPayload;
use crate::adapters::ehr::{EhrClient, HttpStepInvoker, StepInvoker};
use crate::adapters::encryption::{Encryptor, RsaEncryptor};
use crate::config::SdkConfig;
use crate::domain::{AbhaStep, FlowKind, FlowResult, HprStep, Result};
use std::sync::Arc;

/// Entry point for driving ABHA and HPR registrations
///
/// Cheap to share: wrap it in an `Arc` and use it from any number of tasks.
///
/// # Example
///
/// ```rust,no_run
/// use healthid_flow::config::load_config;
/// use healthid_flow::core::HealthIdClient;
/// use healthid_flow::domain::FlowKind;
/// use serde_json::json;
///
/// # async fn example() -> healthid_flow::domain::Result<()> {
/// let config = load_config("healthid.toml")?;
/// let client = HealthIdClient::new(&config)?;
///
/// let result = client
///     .dispatch(FlowKind::Abha, "register_with_aadhaar", json!({"aadhaar": "123456789012"}))
///     .await;
/// println!("next: {:?}", result.next_step);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HealthIdClient {
    abha: RegistrationFlow<AbhaStep>,
    hpr: RegistrationFlow<HprStep>,
}

impl HealthIdClient {
    /// Builds the HTTP invoker and RSA encryptor from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the EHR client cannot be built or the public key
    /// cannot be loaded.
    pub fn new(config: &SdkConfig) -> Result<Self> {
        let invoker = HttpStepInvoker::new(EhrClient::new(&config.ehr)?);
        let encryptor = RsaEncryptor::from_config(&config.encryption)?;

        tracing::debug!(base_url = %invoker.client().base_url(), "Health ID client ready");

        Ok(Self::from_parts(Arc::new(invoker), Arc::new(encryptor)))
    }

    /// Assembles the client from custom collaborators
    pub fn from_parts(invoker: Arc<dyn StepInvoker>, encryptor: Arc<dyn Encryptor>) -> Self {
        let fields = FieldEncryptor::new(encryptor);
        Self {
            abha: RegistrationFlow::abha(Arc::clone(&invoker), fields.clone()),
            hpr: RegistrationFlow::hpr(invoker, fields),
        }
    }

    pub fn abha(&self) -> &RegistrationFlow<AbhaStep> {
        &self.abha
    }

    pub fn hpr(&self) -> &RegistrationFlow<HprStep> {
        &self.hpr
    }

    /// Runs the step named by `alias` in the selected flow
    pub async fn dispatch(
        &self,
        flow: FlowKind,
        alias: &str,
        payload: impl Into<RawPayload>,
    ) -> FlowResult {
        match flow {
            FlowKind::Abha => self.abha.dispatch_alias(alias, payload).await,
            FlowKind::Hpr => self.hpr.dispatch_alias(alias, payload).await,
        }
    }
}
