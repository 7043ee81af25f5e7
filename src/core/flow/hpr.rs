//! HPR creation flow
//!
//! Aadhaar OTP → existing-account check → mobile demographic match (or OTP
//! verification) → HPR ID selection.

use super::engine::RegistrationFlow;
use super::table::{Condition, FlowTable, Route, StepSpec, Transition};
use crate::adapters::ehr::StepInvoker;
use crate::core::encryption::FieldEncryptor;
use crate::core::requests::{
    AadhaarOtpRequest, CreateHprRequest, DemographicAuthRequest, MobileOtpRequest, TxnRequest,
    VerifyOtpRequest,
};
use crate::domain::HprStep;
use std::sync::Arc;

/// Submitted mobile equals the one on the Aadhaar record, or the gateway
/// reports the demographic match itself
const MOBILE_ON_RECORD: Condition = Condition::AnyOf(&[
    Condition::MobileMatches {
        request_field: "mobileNumber",
        response_path: &["mobile"],
    },
    Condition::IsTrue(&["verified"]),
]);

pub fn hpr_table() -> FlowTable<HprStep> {
    FlowTable::from([
        (
            HprStep::RegisterWithAadhaar,
            StepSpec::post::<AadhaarOtpRequest>("hpr/aadhaar/generate-otp")
                .failing_with("Failed to send OTP")
                .then(
                    "OTP sent to the Aadhaar-linked mobile number",
                    Transition::Next(HprStep::VerifyAadhaarOtp),
                ),
        ),
        (
            HprStep::VerifyAadhaarOtp,
            StepSpec::post::<VerifyOtpRequest>("hpr/aadhaar/verify-otp")
                .failing_with("Failed to verify OTP")
                .then(
                    "Aadhaar OTP verified",
                    Transition::Next(HprStep::CheckAccountExists),
                ),
        ),
        (
            HprStep::CheckAccountExists,
            StepSpec::post::<TxnRequest>("hpr/account/check")
                .failing_with("Failed to check HPR account")
                .then(
                    "HPR account check completed",
                    Transition::Branch {
                        when: Condition::Present(&["hprIdNumber"]),
                        then: Route::finish("HPR account already exists"),
                        otherwise: Route::to(
                            HprStep::DemographicAuthViaMobile,
                            "No HPR account found; verify the mobile number against Aadhaar",
                        ),
                    },
                ),
        ),
        (
            HprStep::DemographicAuthViaMobile,
            StepSpec::post::<DemographicAuthRequest>("hpr/mobile/demographic-auth")
                .failing_with("Failed to verify mobile demographics")
                .then(
                    "Mobile demographic check completed",
                    Transition::Branch {
                        when: MOBILE_ON_RECORD,
                        then: Route::to(
                            HprStep::GetHprIdSuggestions,
                            "Mobile number matches Aadhaar records",
                        ),
                        otherwise: Route::to(
                            HprStep::UpdateMobile,
                            "Mobile number does not match Aadhaar records; verify it with an OTP",
                        ),
                    },
                ),
        ),
        (
            HprStep::UpdateMobile,
            StepSpec::post::<MobileOtpRequest>("hpr/mobile/generate-otp")
                .encrypting(&["mobile"])
                .failing_with("Failed to send mobile OTP")
                .then(
                    "OTP sent to the mobile number",
                    Transition::Next(HprStep::VerifyUpdateMobileOtp),
                ),
        ),
        (
            HprStep::VerifyUpdateMobileOtp,
            StepSpec::post::<VerifyOtpRequest>("hpr/mobile/verify-otp")
                .failing_with("Failed to verify mobile OTP")
                .then(
                    "Mobile number verified",
                    Transition::Next(HprStep::GetHprIdSuggestions),
                ),
        ),
        (
            HprStep::GetHprIdSuggestions,
            StepSpec::get::<TxnRequest>("hpr/id/suggestions")
                .failing_with("Failed to fetch HPR ID suggestions")
                .then(
                    "HPR ID suggestions fetched",
                    Transition::Next(HprStep::CreateHpr),
                ),
        ),
        (
            HprStep::CreateHpr,
            StepSpec::post::<CreateHprRequest>("hpr/id/create")
                .failing_with("Failed to create HPR ID")
                .then("HPR ID created successfully", Transition::Terminal),
        ),
    ])
}

impl RegistrationFlow<HprStep> {
    /// HPR flow over the given collaborators
    pub fn hpr(invoker: Arc<dyn StepInvoker>, encryptor: FieldEncryptor) -> Self {
        Self::new(hpr_table(), invoker, encryptor)
    }
}
