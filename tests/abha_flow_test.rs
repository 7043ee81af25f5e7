//! End-to-end tests for the ABHA registration flow with stubbed collaborators

use async_trait::async_trait;
use healthid_flow::adapters::ehr::{HttpMethod, StepInvoker};
use healthid_flow::adapters::encryption::Encryptor;
use healthid_flow::core::encryption::FieldEncryptor;
use healthid_flow::core::requests::AadhaarOtpRequest;
use healthid_flow::core::{HealthIdClient, Payload, RawPayload, RegistrationFlow};
use healthid_flow::domain::{AbhaStep, FlowKind, FlowStep, Result, StepOutcome};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use test_case::test_case;

/// Remote stub: answers every call with a fixed outcome and records what it was sent
struct StubGateway {
    outcome: StepOutcome,
    calls: Mutex<Vec<(String, HttpMethod, Payload)>>,
}

impl StubGateway {
    fn answering(response: Value) -> Arc<Self> {
        Arc::new(Self {
            outcome: StepOutcome::succeeded(response),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn failing(error: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: StepOutcome::failed(error),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(String, HttpMethod, Payload)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StepInvoker for StubGateway {
    async fn invoke(&self, endpoint: &str, method: HttpMethod, body: &Payload) -> StepOutcome {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), method, body.clone()));
        self.outcome.clone()
    }
}

/// Marks values as encrypted without doing any cryptography
struct TaggingEncryptor;

impl Encryptor for TaggingEncryptor {
    fn encrypt(&self, plaintext: &str) -> Result<String> {
        Ok(format!("enc({plaintext})"))
    }
}

fn abha_flow(gateway: Arc<StubGateway>) -> RegistrationFlow<AbhaStep> {
    RegistrationFlow::abha(gateway, FieldEncryptor::new(Arc::new(TaggingEncryptor)))
}

fn client(gateway: Arc<StubGateway>) -> HealthIdClient {
    HealthIdClient::from_parts(gateway, Arc::new(TaggingEncryptor))
}

#[tokio::test]
async fn test_register_with_aadhaar_advances_to_otp_verification() {
    let gateway = StubGateway::answering(json!({"txnId": "t1"}));
    let flow = abha_flow(gateway.clone());

    let result = flow
        .dispatch(AbhaStep::RegisterWithAadhaar, json!({"aadhaar": "123456789012"}))
        .await;

    assert!(!result.is_failure(), "{}", result.message);
    assert_eq!(result.next_step.as_deref(), Some("verify_aadhaar_otp"));
    assert_eq!(result.response_value(&["txnId"]), Some(&json!("t1")));
    assert_eq!(
        result.next_step_payload_shape.as_deref(),
        Some("VerifyAadhaarOtpRequest")
    );
    assert!(result.next_step_hint.unwrap().contains("otp"));

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "abha/aadhaar/generate-otp");
    assert_eq!(calls[0].1, HttpMethod::Post);
}

#[tokio::test]
async fn test_matching_mobile_skips_mobile_verification() {
    let gateway = StubGateway::answering(json!({"ABHAProfile": {"mobile": "9876543210"}}));
    let flow = abha_flow(gateway);

    let result = flow
        .dispatch(
            AbhaStep::VerifyAadhaarOtp,
            json!({"otp": "000000", "txnId": "t1", "mobile": "9876543210"}),
        )
        .await;

    assert_eq!(result.next_step.as_deref(), Some("get_abha_address_suggestions"));
    assert_eq!(result.next::<AbhaStep>(), Some(AbhaStep::GetAbhaAddressSuggestions));
}

#[tokio::test]
async fn test_different_mobile_requires_update() {
    let gateway = StubGateway::answering(json!({"ABHAProfile": {"mobile": "1112223333"}}));
    let flow = abha_flow(gateway);

    let result = flow
        .dispatch(
            AbhaStep::VerifyAadhaarOtp,
            json!({"otp": "000000", "txnId": "t1", "mobile": "9876543210"}),
        )
        .await;

    assert_eq!(result.next_step.as_deref(), Some("update_mobile"));
    assert_eq!(
        result.next_step_payload_shape.as_deref(),
        Some("UpdateMobileRequest")
    );
}

#[tokio::test]
async fn test_missing_profile_mobile_requires_update() {
    let gateway = StubGateway::answering(json!({"txnId": "t1"}));
    let flow = abha_flow(gateway);

    let result = flow
        .dispatch(
            AbhaStep::VerifyAadhaarOtp,
            json!({"otp": "000000", "txnId": "t1", "mobile": "9876543210"}),
        )
        .await;

    assert_eq!(result.next::<AbhaStep>(), Some(AbhaStep::UpdateMobile));
}

#[tokio::test]
async fn test_short_aadhaar_fails_validation_without_remote_call() {
    let gateway = StubGateway::answering(json!({"txnId": "t1"}));
    let flow = abha_flow(gateway.clone());

    let result = flow
        .dispatch(AbhaStep::RegisterWithAadhaar, json!({"aadhaar": "123"}))
        .await;

    assert!(result.next_step.is_none());
    assert!(result.message.contains("Validation failed"));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_alias_is_reported() {
    let gateway = StubGateway::answering(json!({}));
    let client = client(gateway.clone());

    let result = client.dispatch(FlowKind::Abha, "99", json!({})).await;

    assert_eq!(result.error.as_deref(), Some("Invalid step: 99"));
    assert!(result.next_step.is_none());
    assert!(gateway.calls().is_empty());
}

#[test_case(AbhaStep::RegisterWithAadhaar, "register_with_aadhaar", "1")]
#[test_case(AbhaStep::VerifyAadhaarOtp, "verify_aadhaar_otp", "2")]
#[test_case(AbhaStep::UpdateMobile, "update_mobile", "3")]
#[test_case(AbhaStep::VerifyUpdateMobileOtp, "verify_update_mobile_otp", "4")]
#[test_case(AbhaStep::GetAbhaAddressSuggestions, "get_abha_address_suggestions", "5")]
#[test_case(AbhaStep::FinalRegister, "final_register", "6")]
fn test_name_and_code_resolve_to_the_same_step(step: AbhaStep, name: &str, code: &str) {
    assert_eq!(AbhaStep::resolve(name), Some(step));
    assert_eq!(AbhaStep::resolve(code), Some(step));
    assert_eq!(step.name(), name);
    assert_eq!(step.code(), code);
}

#[test_case("0" ; "zero")]
#[test_case("7" ; "past the last step")]
#[test_case("create_hpr" ; "step of the other flow")]
#[test_case("" ; "empty")]
#[test_case("register-with-aadhaar" ; "dashes")]
#[test_case("01" ; "zero padded code")]
#[test_case("+1" ; "signed code")]
#[test_case("0002" ; "double zero padded code")]
fn test_unknown_aliases_do_not_resolve(alias: &str) {
    assert_eq!(AbhaStep::resolve(alias), None);
}

#[test_case(RawPayload::Value(Value::Null) ; "null payload")]
#[test_case(RawPayload::from("{not json") ; "malformed json text")]
#[test_case(RawPayload::from("[1, 2, 3]") ; "json array text")]
#[test_case(RawPayload::Value(json!("123456789012")) ; "bare string")]
#[test_case(RawPayload::Value(json!({"aadhaar": ["1"]})) ; "wrong typed field")]
#[test_case(RawPayload::Value(json!({"aadhaar": null})) ; "null field")]
#[tokio::test]
async fn test_bad_payloads_come_back_as_failures(payload: RawPayload) {
    let gateway = StubGateway::answering(json!({"txnId": "t1"}));
    let flow = abha_flow(gateway.clone());

    let result = flow.dispatch(AbhaStep::RegisterWithAadhaar, payload).await;

    assert!(result.is_failure());
    assert!(result.next_step.is_none());
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_aadhaar_is_sent_encrypted() {
    for aadhaar in ["123456789012", "999999999999", "000000000001"] {
        let gateway = StubGateway::answering(json!({"txnId": "t1"}));
        let flow = abha_flow(gateway.clone());

        let result = flow
            .dispatch(AbhaStep::RegisterWithAadhaar, json!({"aadhaar": aadhaar}))
            .await;
        assert!(!result.is_failure());

        let calls = gateway.calls();
        let sent = calls[0].2.get("aadhaar").unwrap();
        assert_eq!(sent, &json!(format!("enc({aadhaar})")));
        assert_ne!(sent, &json!(aadhaar));
    }
}

#[tokio::test]
async fn test_typed_request_payload_is_accepted() {
    let gateway = StubGateway::answering(json!({"txnId": "t1"}));
    let flow = abha_flow(gateway.clone());
    let request = AadhaarOtpRequest {
        aadhaar: "123456789012".to_string(),
    };

    let result = flow
        .dispatch(AbhaStep::RegisterWithAadhaar, RawPayload::typed(&request))
        .await;

    assert_eq!(result.next::<AbhaStep>(), Some(AbhaStep::VerifyAadhaarOtp));
}

#[tokio::test]
async fn test_json_text_payload_is_accepted() {
    let gateway = StubGateway::answering(json!({"txnId": "t1"}));
    let flow = abha_flow(gateway);

    let result = flow
        .dispatch(AbhaStep::RegisterWithAadhaar, r#"{"aadhaar": "123456789012"}"#)
        .await;

    assert_eq!(result.next::<AbhaStep>(), Some(AbhaStep::VerifyAadhaarOtp));
}

#[tokio::test]
async fn test_update_mobile_encrypts_the_new_number() {
    let gateway = StubGateway::answering(json!({"txnId": "t2"}));
    let flow = abha_flow(gateway.clone());

    let result = flow
        .dispatch(
            AbhaStep::UpdateMobile,
            json!({"updateValue": "9876543210", "txnId": "t1"}),
        )
        .await;

    assert_eq!(result.next::<AbhaStep>(), Some(AbhaStep::VerifyUpdateMobileOtp));
    let calls = gateway.calls();
    assert_eq!(calls[0].2["updateValue"], json!("enc(9876543210)"));
    assert_eq!(calls[0].2["txnId"], json!("t1"));
}

#[tokio::test]
async fn test_address_suggestions_use_get() {
    let gateway = StubGateway::answering(json!({"abhaAddressList": ["asha.k", "asha.k91"]}));
    let flow = abha_flow(gateway.clone());

    let result = flow
        .dispatch(AbhaStep::GetAbhaAddressSuggestions, json!({"txnId": "t1"}))
        .await;

    assert_eq!(result.next::<AbhaStep>(), Some(AbhaStep::FinalRegister));
    assert_eq!(gateway.calls()[0].1, HttpMethod::Get);
}

#[tokio::test]
async fn test_final_register_is_terminal() {
    let gateway = StubGateway::answering(json!({"ABHANumber": "91-1234-5678-9012"}));
    let flow = abha_flow(gateway);

    let result = flow
        .dispatch(
            AbhaStep::FinalRegister,
            json!({"txnId": "t1", "abhaAddress": "asha.k91", "preferred": "1"}),
        )
        .await;

    assert!(!result.is_failure());
    assert!(result.next_step.is_none());
    assert!(result.next_step_hint.is_none());
    assert_eq!(result.message, "ABHA address registered successfully");
    assert_eq!(
        result.response_value(&["ABHANumber"]),
        Some(&json!("91-1234-5678-9012"))
    );
}

#[tokio::test]
async fn test_remote_failure_has_no_next_step() {
    let gateway = StubGateway::failing("Invalid OTP");
    let flow = abha_flow(gateway);

    let result = flow
        .dispatch(
            AbhaStep::VerifyUpdateMobileOtp,
            json!({"otp": "123456", "txnId": "t1"}),
        )
        .await;

    assert!(result.is_failure());
    assert!(result.next_step.is_none());
    assert!(result.message.contains("Invalid OTP"));
    assert!(result.message.starts_with("Failed to verify mobile OTP"));
}

#[tokio::test]
async fn test_full_registration_with_separate_mobile_verification() {
    let client = client(StubGateway::answering(json!({"txnId": "t1"})));
    let mut step = AbhaStep::RegisterWithAadhaar;
    let mut visited = vec![step];

    let payloads = [
        json!({"aadhaar": "123456789012"}),
        json!({"otp": "111111", "txnId": "t1", "mobile": "9876543210"}),
        json!({"updateValue": "9876543210", "txnId": "t1"}),
        json!({"otp": "222222", "txnId": "t1"}),
        json!({"txnId": "t1"}),
        json!({"txnId": "t1", "abhaAddress": "asha.k91"}),
    ];

    for payload in payloads {
        let result = client.abha().dispatch(step, payload).await;
        assert!(!result.is_failure(), "{step}: {}", result.message);
        match result.next::<AbhaStep>() {
            Some(next) => {
                step = next;
                visited.push(next);
            }
            None => break,
        }
    }

    assert_eq!(visited, AbhaStep::all().to_vec());
}
