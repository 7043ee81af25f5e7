//! ABHA creation flow
//!
//! Aadhaar OTP → (optional mobile verification) → ABHA address selection.

use super::engine::RegistrationFlow;
use super::table::{Condition, FlowTable, Route, StepSpec, Transition};
use crate::adapters::ehr::StepInvoker;
use crate::core::encryption::FieldEncryptor;
use crate::core::requests::{
    AadhaarOtpRequest, AbhaAddressRequest, TxnRequest, UpdateMobileRequest,
    VerifyAadhaarOtpRequest, VerifyOtpRequest,
};
use crate::domain::AbhaStep;
use std::sync::Arc;

/// Mobile the caller wants linked vs. the one on the Aadhaar record
const MOBILE_ON_RECORD: Condition = Condition::MobileMatches {
    request_field: "mobile",
    response_path: &["ABHAProfile", "mobile"],
};

pub fn abha_table() -> FlowTable<AbhaStep> {
    FlowTable::from([
        (
            AbhaStep::RegisterWithAadhaar,
            StepSpec::post::<AadhaarOtpRequest>("abha/aadhaar/generate-otp")
                .failing_with("Failed to send OTP")
                .then(
                    "OTP sent to the Aadhaar-linked mobile number",
                    Transition::Next(AbhaStep::VerifyAadhaarOtp),
                ),
        ),
        (
            AbhaStep::VerifyAadhaarOtp,
            StepSpec::post::<VerifyAadhaarOtpRequest>("abha/aadhaar/verify-otp")
                .failing_with("Failed to verify OTP")
                .then(
                    "Aadhaar OTP verified",
                    Transition::Branch {
                        when: MOBILE_ON_RECORD,
                        then: Route::to(
                            AbhaStep::GetAbhaAddressSuggestions,
                            "Aadhaar OTP verified; mobile number matches Aadhaar records",
                        ),
                        otherwise: Route::to(
                            AbhaStep::UpdateMobile,
                            "Aadhaar OTP verified; mobile number must be verified separately",
                        ),
                    },
                ),
        ),
        (
            AbhaStep::UpdateMobile,
            StepSpec::post::<UpdateMobileRequest>("abha/mobile/generate-otp")
                .encrypting(&["updateValue"])
                .failing_with("Failed to send mobile OTP")
                .then(
                    "OTP sent to the new mobile number",
                    Transition::Next(AbhaStep::VerifyUpdateMobileOtp),
                ),
        ),
        (
            AbhaStep::VerifyUpdateMobileOtp,
            StepSpec::post::<VerifyOtpRequest>("abha/mobile/verify-otp")
                .failing_with("Failed to verify mobile OTP")
                .then(
                    "Mobile number verified",
                    Transition::Next(AbhaStep::GetAbhaAddressSuggestions),
                ),
        ),
        (
            AbhaStep::GetAbhaAddressSuggestions,
            StepSpec::get::<TxnRequest>("abha/address/suggestions")
                .failing_with("Failed to fetch ABHA address suggestions")
                .then(
                    "ABHA address suggestions fetched",
                    Transition::Next(AbhaStep::FinalRegister),
                ),
        ),
        (
            AbhaStep::FinalRegister,
            StepSpec::post::<AbhaAddressRequest>("abha/address/create")
                .failing_with("Failed to register ABHA address")
                .then("ABHA address registered successfully", Transition::Terminal),
        ),
    ])
}

impl RegistrationFlow<AbhaStep> {
    /// ABHA flow over the given collaborators
    pub fn abha(invoker: Arc<dyn StepInvoker>, encryptor: FieldEncryptor) -> Self {
        Self::new(abha_table(), invoker, encryptor)
    }
}
