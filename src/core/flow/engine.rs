//! Generic registration state machine
//!
//! [`RegistrationFlow`] runs one step at a time: normalize the payload, validate
//! it against the step's request shape, encrypt sensitive fields, call the
//! remote endpoint, then pick the next step from the transition table. It keeps
//! no state between calls; the caller threads `txnId` through. Two steps racing
//! on the same `txnId` are not serialized here.

use super::table::{FlowTable, StepSpec};
use crate::adapters::ehr::StepInvoker;
use crate::core::encryption::FieldEncryptor;
use crate::core::payload::{normalize, RawPayload};
use crate::domain::{FlowResult, FlowStep, Result, SdkError};
use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::Instrument;

/// Registration state machine for the flow whose steps are `S`
pub struct RegistrationFlow<S: FlowStep> {
    table: FlowTable<S>,
    invoker: Arc<dyn StepInvoker>,
    encryptor: FieldEncryptor,
}

impl<S: FlowStep> RegistrationFlow<S> {
    pub fn new(table: FlowTable<S>, invoker: Arc<dyn StepInvoker>, encryptor: FieldEncryptor) -> Self {
        Self {
            table,
            invoker,
            encryptor,
        }
    }

    /// Table entry for `step`, if the flow defines one
    pub fn spec(&self, step: S) -> Option<&StepSpec<S>> {
        self.table.get(&step)
    }

    /// Table entries in typical flow order
    pub fn steps(&self) -> Vec<(S, &StepSpec<S>)> {
        S::all()
            .iter()
            .filter_map(|step| self.table.get(step).map(|spec| (*step, spec)))
            .collect()
    }

    /// Payload hint for `step`, empty when the step has no table entry
    pub fn hint_for(&self, step: S) -> &'static str {
        self.table
            .get(&step)
            .map(|spec| spec.request.hint)
            .unwrap_or_default()
    }

    /// Runs one step
    ///
    /// Never fails: every error, and any panic raised while handling the step,
    /// is reported through the returned [`FlowResult`].
    pub async fn dispatch(&self, step: S, payload: impl Into<RawPayload>) -> FlowResult {
        let raw = payload.into();

        let Some(spec) = self.table.get(&step) else {
            crate::log_step_failure!(S::FLOW, step.name(), "step has no table entry");
            return FlowResult::failure("Invalid step in registration flow");
        };

        let span = tracing::info_span!("registration_step", flow = %S::FLOW, step = step.name());
        let handled = AssertUnwindSafe(self.handle(step, spec, raw).instrument(span))
            .catch_unwind()
            .await;

        let result = match handled {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                crate::log_error_with_context!(&e, "Registration step raised an error");
                FlowResult::failure(format!("Internal error: {e}"))
            }
            Err(panic) => {
                let message = panic_message(&*panic);
                crate::log_error_with_context!(&message, "Registration step panicked");
                FlowResult::failure(format!("Internal error: {message}"))
            }
        };

        if result.is_failure() {
            crate::log_step_failure!(S::FLOW, step.name(), result.message);
        }

        result
    }

    /// Runs the step named by `alias`: a canonical name or a numeric code
    pub async fn dispatch_alias(&self, alias: &str, payload: impl Into<RawPayload>) -> FlowResult {
        match S::resolve(alias) {
            Some(step) => self.dispatch(step, payload).await,
            None => {
                tracing::warn!(flow = %S::FLOW, alias, "Unknown step alias");
                FlowResult::failure(SdkError::UnknownStep(alias.to_string()).to_string())
            }
        }
    }

    async fn handle(&self, step: S, spec: &StepSpec<S>, raw: RawPayload) -> Result<FlowResult> {
        crate::log_step_dispatch!(S::FLOW, step.name(), spec.endpoint);

        let payload = match normalize(raw) {
            Ok(payload) => payload,
            Err(SdkError::MalformedPayload(reason)) => {
                return Ok(FlowResult::failure(format!("Invalid payload: {reason}")));
            }
            Err(e) => return Err(e),
        };

        match spec.request.check(&payload) {
            Ok(()) => {}
            Err(SdkError::Validation(errors)) => {
                return Ok(FlowResult::failure(format!("Validation failed: {errors}")));
            }
            Err(e) => return Err(e),
        }

        let body = self
            .encryptor
            .encrypt_sensitive_fields(payload.clone(), spec.encrypted_fields)?;

        let outcome = self.invoker.invoke(spec.endpoint, spec.method, &body).await;

        if !outcome.is_success() {
            let failure = SdkError::RemoteStep {
                phrase: spec.failure_phrase.to_string(),
                message: outcome.error().unwrap_or("unknown error").to_string(),
            };
            return Ok(FlowResult::failure(failure.to_string()));
        }

        let empty = Value::Null;
        let response = outcome.response().unwrap_or(&empty);
        let route = spec
            .transition
            .route(spec.success_message, &payload, response);

        crate::log_step_transition!(S::FLOW, step.name(), route.next.map(|s| s.name()));

        Ok(match route.next {
            Some(next) => {
                FlowResult::advance(route.message, outcome.to_value(), next, self.hint_for(next))
            }
            None => FlowResult::terminal(route.message, outcome.to_value()),
        })
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "step handler panicked".to_string()
    }
}

impl<S: FlowStep> fmt::Debug for RegistrationFlow<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationFlow")
            .field("flow", &S::FLOW)
            .field("steps", &self.table.len())
            .field("encryptor", &self.encryptor)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ehr::HttpMethod;
    use crate::adapters::encryption::Encryptor;
    use crate::core::flow::abha_table;
    use crate::core::payload::Payload;
    use crate::domain::{AbhaStep, StepOutcome};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct EchoEncryptor;

    impl Encryptor for EchoEncryptor {
        fn encrypt(&self, plaintext: &str) -> Result<String> {
            Ok(format!("enc:{plaintext}"))
        }
    }

    struct BrokenEncryptor;

    impl Encryptor for BrokenEncryptor {
        fn encrypt(&self, _plaintext: &str) -> Result<String> {
            Err(SdkError::Encryption("no key loaded".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingInvoker {
        calls: Mutex<Vec<(String, HttpMethod, Payload)>>,
        reply: Mutex<Option<StepOutcome>>,
    }

    impl RecordingInvoker {
        fn replying(outcome: StepOutcome) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                reply: Mutex::new(Some(outcome)),
            }
        }

        fn calls(&self) -> Vec<(String, HttpMethod, Payload)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StepInvoker for RecordingInvoker {
        async fn invoke(&self, endpoint: &str, method: HttpMethod, body: &Payload) -> StepOutcome {
            self.calls
                .lock()
                .unwrap()
                .push((endpoint.to_string(), method, body.clone()));
            self.reply
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| StepOutcome::succeeded(json!({})))
        }
    }

    struct PanickingInvoker;

    #[async_trait]
    impl StepInvoker for PanickingInvoker {
        async fn invoke(&self, _endpoint: &str, _method: HttpMethod, _body: &Payload) -> StepOutcome {
            panic!("connection pool poisoned")
        }
    }

    fn flow(invoker: Arc<dyn StepInvoker>) -> RegistrationFlow<AbhaStep> {
        RegistrationFlow::new(
            abha_table(),
            invoker,
            FieldEncryptor::new(Arc::new(EchoEncryptor)),
        )
    }

    #[tokio::test]
    async fn test_successful_step_advances() {
        let invoker = Arc::new(RecordingInvoker::replying(StepOutcome::succeeded(
            json!({"txnId": "t-1"}),
        )));
        let flow = flow(invoker.clone());

        let result = flow
            .dispatch(AbhaStep::RegisterWithAadhaar, json!({"aadhaar": "123456789012"}))
            .await;

        assert!(!result.is_failure());
        assert_eq!(result.next_step.as_deref(), Some("verify_aadhaar_otp"));
        assert_eq!(
            result.next_step_payload_shape.as_deref(),
            Some("VerifyAadhaarOtpRequest")
        );
        assert_eq!(result.response_value(&["txnId"]), Some(&json!("t-1")));

        let calls = invoker.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "abha/aadhaar/generate-otp");
        assert_eq!(calls[0].1, HttpMethod::Post);
        assert_eq!(calls[0].2["aadhaar"], "enc:123456789012");
    }

    #[tokio::test]
    async fn test_remote_failure_uses_step_phrase() {
        let invoker = Arc::new(RecordingInvoker::replying(StepOutcome::failed(
            "HTTP 400: Invalid OTP",
        )));
        let flow = flow(invoker);

        let result = flow
            .dispatch(
                AbhaStep::VerifyUpdateMobileOtp,
                json!({"otp": "123456", "txnId": "t-1"}),
            )
            .await;

        assert_eq!(result.message, "Failed to verify mobile OTP: HTTP 400: Invalid OTP");
        assert!(result.next_step.is_none());
        assert!(result.data.is_none());
    }

    #[tokio::test]
    async fn test_malformed_payload_is_reported() {
        let invoker = Arc::new(RecordingInvoker::default());
        let flow = flow(invoker.clone());

        let result = flow.dispatch(AbhaStep::RegisterWithAadhaar, "{not json").await;

        assert!(result.message.starts_with("Invalid payload:"));
        assert!(invoker.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_table_entry() {
        let mut table = abha_table();
        table.remove(&AbhaStep::FinalRegister);
        let flow = RegistrationFlow::new(
            table,
            Arc::new(RecordingInvoker::default()),
            FieldEncryptor::new(Arc::new(EchoEncryptor)),
        );

        let result = flow
            .dispatch(
                AbhaStep::FinalRegister,
                json!({"txnId": "t", "abhaAddress": "ravi.kumar"}),
            )
            .await;

        assert_eq!(result.message, "Invalid step in registration flow");
        assert!(result.next_step.is_none());
        assert_eq!(flow.steps().len(), 5);
    }

    #[tokio::test]
    async fn test_encryption_failure_becomes_internal_error() {
        let invoker = Arc::new(RecordingInvoker::default());
        let flow = RegistrationFlow::new(
            abha_table(),
            invoker.clone(),
            FieldEncryptor::new(Arc::new(BrokenEncryptor)),
        );

        let result = flow
            .dispatch(AbhaStep::RegisterWithAadhaar, json!({"aadhaar": "123456789012"}))
            .await;

        assert!(result.message.starts_with("Internal error:"));
        assert!(result.message.contains("no key loaded"));
        assert!(invoker.calls().is_empty());
    }

    #[tokio::test]
    async fn test_panic_in_handler_is_contained() {
        let flow = flow(Arc::new(PanickingInvoker));

        let result = flow
            .dispatch(AbhaStep::RegisterWithAadhaar, json!({"aadhaar": "123456789012"}))
            .await;

        assert_eq!(result.message, "Internal error: connection pool poisoned");
        assert_eq!(result.error.as_deref(), Some(result.message.as_str()));
    }

    #[tokio::test]
    async fn test_dispatch_alias_unknown() {
        let invoker = Arc::new(RecordingInvoker::default());
        let flow = flow(invoker.clone());

        let result = flow.dispatch_alias("99", json!({})).await;

        assert_eq!(result.message, "Invalid step: 99");
        assert_eq!(result.error.as_deref(), Some("Invalid step: 99"));
        assert!(invoker.calls().is_empty());
    }

    #[test]
    fn test_panic_message_variants() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42_u8), "step handler panicked");
    }
}
