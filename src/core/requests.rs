//! Typed step requests
//!
//! One struct per payload shape. Each is decoded explicitly from the
//! normalized payload by reading its named keys, and declares the field rules
//! the validator enforces. The structs also serialize with the wire key names,
//! so callers can build payloads from them with `RawPayload::typed`.

use super::payload::{optional_text_field, text_field, Payload};
use super::validation::{FieldFormat, FieldRule, StepRequest};
use serde::{Deserialize, Serialize};

const AADHAAR: FieldFormat = FieldFormat::Digits(12);
const OTP: FieldFormat = FieldFormat::Digits(6);
const MOBILE: FieldFormat = FieldFormat::Digits(10);
const EMAIL: FieldFormat = FieldFormat::Pattern {
    regex: r"^[^@\s]+@[^@\s]+\.[^@\s]+$",
    description: "a valid email address",
};
const HEALTH_ADDRESS: FieldFormat = FieldFormat::Pattern {
    regex: r"^[A-Za-z0-9._]{4,32}(@[A-Za-z]+)?$",
    description: "4-32 letters, digits, dots or underscores",
};

/// Aadhaar number for OTP generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AadhaarOtpRequest {
    pub aadhaar: String,
}

impl StepRequest for AadhaarOtpRequest {
    const SHAPE: &'static str = "AadhaarOtpRequest";
    const HINT: &'static str = "Provide 'aadhaar': the 12-digit Aadhaar number";

    fn rules() -> &'static [FieldRule] {
        const RULES: &[FieldRule] = &[FieldRule::required("aadhaar").format(AADHAAR)];
        RULES
    }

    fn decode(payload: &Payload) -> Self {
        Self {
            aadhaar: text_field(payload, "aadhaar"),
        }
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "aadhaar" => Some(&self.aadhaar),
            _ => None,
        }
    }
}

/// Aadhaar OTP plus the mobile number the caller wants linked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyAadhaarOtpRequest {
    pub otp: String,
    pub txn_id: String,
    pub mobile: String,
}

impl StepRequest for VerifyAadhaarOtpRequest {
    const SHAPE: &'static str = "VerifyAadhaarOtpRequest";
    const HINT: &'static str = "Provide 'otp' (6 digits) received on the Aadhaar-linked mobile, \
                                'txnId' from the previous step and 'mobile' (10 digits) to link";

    fn rules() -> &'static [FieldRule] {
        const RULES: &[FieldRule] = &[
            FieldRule::required("otp").format(OTP),
            FieldRule::required("txnId"),
            FieldRule::required("mobile").format(MOBILE),
        ];
        RULES
    }

    fn decode(payload: &Payload) -> Self {
        Self {
            otp: text_field(payload, "otp"),
            txn_id: text_field(payload, "txnId"),
            mobile: text_field(payload, "mobile"),
        }
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "otp" => Some(&self.otp),
            "txnId" => Some(&self.txn_id),
            "mobile" => Some(&self.mobile),
            _ => None,
        }
    }
}

/// OTP verification within an existing transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub otp: String,
    pub txn_id: String,
}

impl StepRequest for VerifyOtpRequest {
    const SHAPE: &'static str = "VerifyOtpRequest";
    const HINT: &'static str = "Provide 'otp' (6 digits) and 'txnId' from the previous step";

    fn rules() -> &'static [FieldRule] {
        const RULES: &[FieldRule] = &[
            FieldRule::required("otp").format(OTP),
            FieldRule::required("txnId"),
        ];
        RULES
    }

    fn decode(payload: &Payload) -> Self {
        Self {
            otp: text_field(payload, "otp"),
            txn_id: text_field(payload, "txnId"),
        }
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "otp" => Some(&self.otp),
            "txnId" => Some(&self.txn_id),
            _ => None,
        }
    }
}

/// New mobile number for an ABHA enrolment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMobileRequest {
    pub update_value: String,
    pub txn_id: String,
}

impl StepRequest for UpdateMobileRequest {
    const SHAPE: &'static str = "UpdateMobileRequest";
    const HINT: &'static str =
        "Provide 'updateValue': the 10-digit mobile number to link, and 'txnId'";

    fn rules() -> &'static [FieldRule] {
        const RULES: &[FieldRule] = &[
            FieldRule::required("updateValue").format(MOBILE),
            FieldRule::required("txnId"),
        ];
        RULES
    }

    fn decode(payload: &Payload) -> Self {
        Self {
            update_value: text_field(payload, "updateValue"),
            txn_id: text_field(payload, "txnId"),
        }
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "updateValue" => Some(&self.update_value),
            "txnId" => Some(&self.txn_id),
            _ => None,
        }
    }
}

/// Steps that only need the transaction id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxnRequest {
    pub txn_id: String,
}

impl StepRequest for TxnRequest {
    const SHAPE: &'static str = "TxnRequest";
    const HINT: &'static str = "Provide 'txnId' from the previous step";

    fn rules() -> &'static [FieldRule] {
        const RULES: &[FieldRule] = &[FieldRule::required("txnId")];
        RULES
    }

    fn decode(payload: &Payload) -> Self {
        Self {
            txn_id: text_field(payload, "txnId"),
        }
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "txnId" => Some(&self.txn_id),
            _ => None,
        }
    }
}

/// Chosen ABHA address for the final enrolment commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbhaAddressRequest {
    pub txn_id: String,
    pub abha_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred: Option<String>,
}

impl StepRequest for AbhaAddressRequest {
    const SHAPE: &'static str = "AbhaAddressRequest";
    const HINT: &'static str = "Provide 'txnId' and 'abhaAddress' chosen from the suggestions; \
                                optionally 'preferred' (1 to mark it as the preferred address)";

    fn rules() -> &'static [FieldRule] {
        const RULES: &[FieldRule] = &[
            FieldRule::required("txnId"),
            FieldRule::required("abhaAddress").format(HEALTH_ADDRESS),
            FieldRule::optional("preferred"),
        ];
        RULES
    }

    fn decode(payload: &Payload) -> Self {
        Self {
            txn_id: text_field(payload, "txnId"),
            abha_address: text_field(payload, "abhaAddress"),
            preferred: optional_text_field(payload, "preferred"),
        }
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "txnId" => Some(&self.txn_id),
            "abhaAddress" => Some(&self.abha_address),
            "preferred" => self.preferred.as_deref(),
            _ => None,
        }
    }
}

/// Mobile number checked against the Aadhaar demographic record (HPR)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicAuthRequest {
    pub txn_id: String,
    pub mobile_number: String,
}

impl StepRequest for DemographicAuthRequest {
    const SHAPE: &'static str = "DemographicAuthRequest";
    const HINT: &'static str =
        "Provide 'txnId' and 'mobileNumber' (10 digits) to match against the Aadhaar record";

    fn rules() -> &'static [FieldRule] {
        const RULES: &[FieldRule] = &[
            FieldRule::required("txnId"),
            FieldRule::required("mobileNumber").format(MOBILE),
        ];
        RULES
    }

    fn decode(payload: &Payload) -> Self {
        Self {
            txn_id: text_field(payload, "txnId"),
            mobile_number: text_field(payload, "mobileNumber"),
        }
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "txnId" => Some(&self.txn_id),
            "mobileNumber" => Some(&self.mobile_number),
            _ => None,
        }
    }
}

/// Mobile number that should receive a verification OTP (HPR)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileOtpRequest {
    pub mobile: String,
    pub txn_id: String,
}

impl StepRequest for MobileOtpRequest {
    const SHAPE: &'static str = "MobileOtpRequest";
    const HINT: &'static str = "Provide 'mobile' (10 digits) to receive an OTP, and 'txnId'";

    fn rules() -> &'static [FieldRule] {
        const RULES: &[FieldRule] = &[
            FieldRule::required("mobile").format(MOBILE),
            FieldRule::required("txnId"),
        ];
        RULES
    }

    fn decode(payload: &Payload) -> Self {
        Self {
            mobile: text_field(payload, "mobile"),
            txn_id: text_field(payload, "txnId"),
        }
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "mobile" => Some(&self.mobile),
            "txnId" => Some(&self.txn_id),
            _ => None,
        }
    }
}

/// Final HPR ID creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHprRequest {
    pub txn_id: String,
    pub hpr_id: String,
    pub password: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp_category_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp_sub_category_code: Option<String>,
}

impl StepRequest for CreateHprRequest {
    const SHAPE: &'static str = "CreateHprRequest";
    const HINT: &'static str = "Provide 'txnId', 'hprId' chosen from the suggestions, \
                                'password' and 'email'; optionally 'firstName', 'lastName', \
                                'hpCategoryCode' and 'hpSubCategoryCode'";

    fn rules() -> &'static [FieldRule] {
        const RULES: &[FieldRule] = &[
            FieldRule::required("txnId"),
            FieldRule::required("hprId").format(HEALTH_ADDRESS),
            FieldRule::required("password"),
            FieldRule::required("email").format(EMAIL),
            FieldRule::optional("firstName"),
            FieldRule::optional("lastName"),
            FieldRule::optional("hpCategoryCode"),
            FieldRule::optional("hpSubCategoryCode"),
        ];
        RULES
    }

    fn decode(payload: &Payload) -> Self {
        Self {
            txn_id: text_field(payload, "txnId"),
            hpr_id: text_field(payload, "hprId"),
            password: text_field(payload, "password"),
            email: text_field(payload, "email"),
            first_name: optional_text_field(payload, "firstName"),
            last_name: optional_text_field(payload, "lastName"),
            hp_category_code: optional_text_field(payload, "hpCategoryCode"),
            hp_sub_category_code: optional_text_field(payload, "hpSubCategoryCode"),
        }
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "txnId" => Some(&self.txn_id),
            "hprId" => Some(&self.hpr_id),
            "password" => Some(&self.password),
            "email" => Some(&self.email),
            "firstName" => self.first_name.as_deref(),
            "lastName" => self.last_name.as_deref(),
            "hpCategoryCode" => self.hp_category_code.as_deref(),
            "hpSubCategoryCode" => self.hp_sub_category_code.as_deref(),
            _ => None,
        }
    }
}
