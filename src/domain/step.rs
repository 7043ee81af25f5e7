//! Registration flow steps
//!
//! Each registration flow (ABHA, HPR) names its protocol stages with its own
//! enum. Both enums implement [`FlowStep`], which is what the generic flow
//! engine is parameterized over.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// Which registration flow a step belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    /// Ayushman Bharat Health Account creation
    Abha,
    /// Healthcare Professional Registry ID creation
    Hpr,
}

impl FlowKind {
    /// Lower-case flow name
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowKind::Abha => "abha",
            FlowKind::Hpr => "hpr",
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abha" => Ok(FlowKind::Abha),
            "hpr" => Ok(FlowKind::Hpr),
            other => Err(format!("Unknown flow '{other}'. Expected one of: abha, hpr")),
        }
    }
}

/// A stage of a registration protocol
///
/// Every step has a canonical snake-case name, a numeric code equal to its
/// 1-based position in the typical flow, and the name of the payload shape it
/// expects. Callers may address a step by either name or code.
pub trait FlowStep: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Flow this step enum belongs to
    const FLOW: FlowKind;

    /// All steps in typical flow order
    fn all() -> &'static [Self];

    /// Canonical name, e.g. `register_with_aadhaar`
    fn name(&self) -> &'static str;

    /// Name of the request shape this step expects
    fn payload_shape(&self) -> &'static str;

    /// 1-based position in the typical flow; doubles as the numeric alias
    fn ordinal(&self) -> usize {
        Self::all()
            .iter()
            .position(|s| s == self)
            .map(|i| i + 1)
            .unwrap_or_default()
    }

    /// Numeric alias as a string
    fn code(&self) -> String {
        self.ordinal().to_string()
    }

    /// Resolves a canonical name (case-insensitive) or numeric code
    fn resolve(alias: &str) -> Option<Self> {
        let alias = alias.trim();
        Self::all()
            .iter()
            .find(|s| s.code() == alias || s.name().eq_ignore_ascii_case(alias))
            .copied()
    }
}

/// Steps of the ABHA creation flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbhaStep {
    RegisterWithAadhaar,
    VerifyAadhaarOtp,
    UpdateMobile,
    VerifyUpdateMobileOtp,
    GetAbhaAddressSuggestions,
    FinalRegister,
}

impl FlowStep for AbhaStep {
    const FLOW: FlowKind = FlowKind::Abha;

    fn all() -> &'static [Self] {
        &[
            AbhaStep::RegisterWithAadhaar,
            AbhaStep::VerifyAadhaarOtp,
            AbhaStep::UpdateMobile,
            AbhaStep::VerifyUpdateMobileOtp,
            AbhaStep::GetAbhaAddressSuggestions,
            AbhaStep::FinalRegister,
        ]
    }

    fn name(&self) -> &'static str {
        match self {
            AbhaStep::RegisterWithAadhaar => "register_with_aadhaar",
            AbhaStep::VerifyAadhaarOtp => "verify_aadhaar_otp",
            AbhaStep::UpdateMobile => "update_mobile",
            AbhaStep::VerifyUpdateMobileOtp => "verify_update_mobile_otp",
            AbhaStep::GetAbhaAddressSuggestions => "get_abha_address_suggestions",
            AbhaStep::FinalRegister => "final_register",
        }
    }

    fn payload_shape(&self) -> &'static str {
        match self {
            AbhaStep::RegisterWithAadhaar => "AadhaarOtpRequest",
            AbhaStep::VerifyAadhaarOtp => "VerifyAadhaarOtpRequest",
            AbhaStep::UpdateMobile => "UpdateMobileRequest",
            AbhaStep::VerifyUpdateMobileOtp => "VerifyOtpRequest",
            AbhaStep::GetAbhaAddressSuggestions => "TxnRequest",
            AbhaStep::FinalRegister => "AbhaAddressRequest",
        }
    }
}

impl fmt::Display for AbhaStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Steps of the HPR creation flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HprStep {
    RegisterWithAadhaar,
    VerifyAadhaarOtp,
    CheckAccountExists,
    DemographicAuthViaMobile,
    UpdateMobile,
    VerifyUpdateMobileOtp,
    GetHprIdSuggestions,
    CreateHpr,
}

impl FlowStep for HprStep {
    const FLOW: FlowKind = FlowKind::Hpr;

    fn all() -> &'static [Self] {
        &[
            HprStep::RegisterWithAadhaar,
            HprStep::VerifyAadhaarOtp,
            HprStep::CheckAccountExists,
            HprStep::DemographicAuthViaMobile,
            HprStep::UpdateMobile,
            HprStep::VerifyUpdateMobileOtp,
            HprStep::GetHprIdSuggestions,
            HprStep::CreateHpr,
        ]
    }

    fn name(&self) -> &'static str {
        match self {
            HprStep::RegisterWithAadhaar => "register_with_aadhaar",
            HprStep::VerifyAadhaarOtp => "verify_aadhaar_otp",
            HprStep::CheckAccountExists => "check_account_exists",
            HprStep::DemographicAuthViaMobile => "demographic_auth_via_mobile",
            HprStep::UpdateMobile => "update_mobile",
            HprStep::VerifyUpdateMobileOtp => "verify_update_mobile_otp",
            HprStep::GetHprIdSuggestions => "get_hpr_id_suggestions",
            HprStep::CreateHpr => "create_hpr",
        }
    }

    fn payload_shape(&self) -> &'static str {
        match self {
            HprStep::RegisterWithAadhaar => "AadhaarOtpRequest",
            HprStep::VerifyAadhaarOtp => "VerifyOtpRequest",
            HprStep::CheckAccountExists => "TxnRequest",
            HprStep::DemographicAuthViaMobile => "DemographicAuthRequest",
            HprStep::UpdateMobile => "MobileOtpRequest",
            HprStep::VerifyUpdateMobileOtp => "VerifyOtpRequest",
            HprStep::GetHprIdSuggestions => "TxnRequest",
            HprStep::CreateHpr => "CreateHprRequest",
        }
    }
}

impl fmt::Display for HprStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
