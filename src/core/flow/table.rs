//! Transition table types
//!
//! A flow is data: one [`StepSpec`] per step, keyed by step in a [`FlowTable`].
//! The engine reads the table; it never matches on concrete step variants.

use crate::adapters::ehr::HttpMethod;
use crate::core::payload::{json_path, optional_text_field, scalar_text, Payload};
use crate::core::validation::{check_payload, StepRequest};
use crate::domain::{FlowStep, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Step → table entry lookup for one flow
pub type FlowTable<S> = HashMap<S, StepSpec<S>>;

/// Request shape a step accepts, with its decode-and-validate function
#[derive(Clone, Copy)]
pub struct RequestContract {
    pub shape: &'static str,
    pub hint: &'static str,
    check: fn(&Payload) -> Result<()>,
}

impl RequestContract {
    pub fn of<R: StepRequest>() -> Self {
        Self {
            shape: R::SHAPE,
            hint: R::HINT,
            check: check_shape::<R>,
        }
    }

    /// Decodes and validates `payload` against this shape
    pub fn check(&self, payload: &Payload) -> Result<()> {
        (self.check)(payload)
    }
}

fn check_shape<R: StepRequest>(payload: &Payload) -> Result<()> {
    check_payload::<R>(payload).map(|_| ())
}

impl fmt::Debug for RequestContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContract")
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

/// Predicate over a successful step's request and remote response
///
/// Every variant is total: a missing path logs a warning and evaluates to
/// `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Request field equals the scalar at `response_path`
    MobileMatches {
        request_field: &'static str,
        response_path: &'static [&'static str],
    },
    /// Response value is `true` or `"true"`
    IsTrue(&'static [&'static str]),
    /// Response value is a non-empty string, a number or a non-empty object
    Present(&'static [&'static str]),
    /// At least one of the conditions holds, checked in order
    AnyOf(&'static [Condition]),
}

impl Condition {
    pub fn evaluate(&self, request: &Payload, response: &Value) -> bool {
        match self {
            Condition::MobileMatches {
                request_field,
                response_path,
            } => {
                let requested = optional_text_field(request, request_field);
                let returned = lookup(response, response_path).and_then(scalar_text);
                match (requested, returned) {
                    (Some(requested), Some(returned)) => requested.trim() == returned.trim(),
                    (None, _) => {
                        tracing::warn!(field = request_field, "Request field missing for comparison");
                        false
                    }
                    (_, None) => false,
                }
            }
            Condition::IsTrue(path) => match lookup(response, path) {
                Some(Value::Bool(flag)) => *flag,
                Some(Value::String(text)) => text.trim().eq_ignore_ascii_case("true"),
                _ => false,
            },
            Condition::Present(path) => match lookup(response, path) {
                Some(Value::String(text)) => !text.trim().is_empty(),
                Some(Value::Number(_)) => true,
                Some(Value::Object(map)) => !map.is_empty(),
                _ => false,
            },
            Condition::AnyOf(conditions) => conditions
                .iter()
                .any(|condition| condition.evaluate(request, response)),
        }
    }
}

fn lookup<'a>(response: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let found = json_path(response, path);
    if found.is_none() {
        tracing::warn!(path = %path.join("."), "Response path not found");
    }
    found
}

/// Destination of a branch: next step (or terminal) plus the result message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route<S> {
    pub next: Option<S>,
    pub message: &'static str,
}

impl<S> Route<S> {
    pub const fn to(next: S, message: &'static str) -> Self {
        Self {
            next: Some(next),
            message,
        }
    }

    pub const fn finish(message: &'static str) -> Self {
        Self {
            next: None,
            message,
        }
    }
}

/// What happens after a step succeeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<S> {
    Next(S),
    Terminal,
    Branch {
        when: Condition,
        then: Route<S>,
        otherwise: Route<S>,
    },
}

impl<S: FlowStep> Transition<S> {
    /// Picks the route for a successful call
    ///
    /// `message` is used for the fixed transitions; branches carry their own.
    pub fn route(&self, message: &'static str, request: &Payload, response: &Value) -> Route<S> {
        match self {
            Transition::Next(next) => Route::to(*next, message),
            Transition::Terminal => Route::finish(message),
            Transition::Branch {
                when,
                then,
                otherwise,
            } => {
                if when.evaluate(request, response) {
                    *then
                } else {
                    *otherwise
                }
            }
        }
    }

    /// Every step this transition can lead to
    pub fn targets(&self) -> Vec<S> {
        match self {
            Transition::Next(next) => vec![*next],
            Transition::Terminal => Vec::new(),
            Transition::Branch {
                then, otherwise, ..
            } => then.next.into_iter().chain(otherwise.next).collect(),
        }
    }

    /// Short human description, used by the `steps` command
    pub fn describe(&self) -> String {
        let route = |r: &Route<S>| r.next.map(|s| s.name()).unwrap_or("(end)");
        match self {
            Transition::Next(next) => next.name().to_string(),
            Transition::Terminal => "(end)".to_string(),
            Transition::Branch {
                then, otherwise, ..
            } => format!("{} | {}", route(then), route(otherwise)),
        }
    }
}

/// Everything the engine needs to run one step
#[derive(Debug, Clone)]
pub struct StepSpec<S> {
    pub endpoint: &'static str,
    pub method: HttpMethod,
    pub request: RequestContract,
    /// Payload keys encrypted for this step on top of the global table
    pub encrypted_fields: &'static [&'static str],
    pub failure_phrase: &'static str,
    pub success_message: &'static str,
    pub transition: Transition<S>,
}

impl<S> StepSpec<S> {
    pub fn post<R: StepRequest>(endpoint: &'static str) -> Self {
        Self::new::<R>(HttpMethod::Post, endpoint)
    }

    pub fn get<R: StepRequest>(endpoint: &'static str) -> Self {
        Self::new::<R>(HttpMethod::Get, endpoint)
    }

    fn new<R: StepRequest>(method: HttpMethod, endpoint: &'static str) -> Self {
        Self {
            endpoint,
            method,
            request: RequestContract::of::<R>(),
            encrypted_fields: &[],
            failure_phrase: "Step failed",
            success_message: "Step completed",
            transition: Transition::Terminal,
        }
    }

    pub fn encrypting(mut self, fields: &'static [&'static str]) -> Self {
        self.encrypted_fields = fields;
        self
    }

    pub fn failing_with(mut self, phrase: &'static str) -> Self {
        self.failure_phrase = phrase;
        self
    }

    pub fn then(mut self, message: &'static str, transition: Transition<S>) -> Self {
        self.success_message = message;
        self.transition = transition;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::requests::TxnRequest;
    use crate::domain::AbhaStep;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    const MOBILE: Condition = Condition::MobileMatches {
        request_field: "mobile",
        response_path: &["ABHAProfile", "mobile"],
    };

    #[test]
    fn test_mobile_matches() {
        let request = payload(json!({"mobile": "9876543210"}));
        assert!(MOBILE.evaluate(&request, &json!({"ABHAProfile": {"mobile": "9876543210"}})));
        assert!(!MOBILE.evaluate(&request, &json!({"ABHAProfile": {"mobile": "9123456780"}})));
        assert!(!MOBILE.evaluate(&request, &json!({"ABHAProfile": {}})));
        assert!(!MOBILE.evaluate(&request, &json!("not an object")));
        assert!(!MOBILE.evaluate(&payload(json!({})), &json!({"ABHAProfile": {"mobile": "1"}})));
    }

    #[test]
    fn test_mobile_matches_numeric_response() {
        let request = payload(json!({"mobile": "9876543210"}));
        assert!(MOBILE.evaluate(&request, &json!({"ABHAProfile": {"mobile": 9876543210u64}})));
    }

    #[test]
    fn test_is_true() {
        let cond = Condition::IsTrue(&["verified"]);
        let empty = Payload::new();
        assert!(cond.evaluate(&empty, &json!({"verified": true})));
        assert!(cond.evaluate(&empty, &json!({"verified": "TRUE"})));
        assert!(!cond.evaluate(&empty, &json!({"verified": false})));
        assert!(!cond.evaluate(&empty, &json!({"verified": 1})));
        assert!(!cond.evaluate(&empty, &json!({})));
    }

    #[test]
    fn test_present() {
        let cond = Condition::Present(&["hprIdNumber"]);
        let empty = Payload::new();
        assert!(cond.evaluate(&empty, &json!({"hprIdNumber": "71-0000-1111-2222"})));
        assert!(cond.evaluate(&empty, &json!({"hprIdNumber": 7100001111u64})));
        assert!(!cond.evaluate(&empty, &json!({"hprIdNumber": ""})));
        assert!(!cond.evaluate(&empty, &json!({"hprIdNumber": null})));
        assert!(!cond.evaluate(&empty, &json!({})));
    }

    #[test]
    fn test_any_of_holds_when_one_condition_does() {
        const EITHER: Condition = Condition::AnyOf(&[MOBILE, Condition::IsTrue(&["verified"])]);
        let request = payload(json!({"mobile": "9876543210"}));

        assert!(EITHER.evaluate(&request, &json!({"ABHAProfile": {"mobile": "9876543210"}})));
        assert!(EITHER.evaluate(&request, &json!({"verified": true})));
        assert!(!EITHER.evaluate(&request, &json!({"ABHAProfile": {"mobile": "9123456780"}})));
        assert!(!EITHER.evaluate(&request, &json!({})));
        assert!(!Condition::AnyOf(&[]).evaluate(&request, &json!({"verified": true})));
    }

    #[test]
    fn test_branch_routes() {
        let transition = Transition::Branch {
            when: MOBILE,
            then: Route::to(AbhaStep::GetAbhaAddressSuggestions, "matched"),
            otherwise: Route::to(AbhaStep::UpdateMobile, "update"),
        };
        let request = payload(json!({"mobile": "9876543210"}));

        let route = transition.route(
            "unused",
            &request,
            &json!({"ABHAProfile": {"mobile": "9876543210"}}),
        );
        assert_eq!(route.next, Some(AbhaStep::GetAbhaAddressSuggestions));
        assert_eq!(route.message, "matched");

        let route = transition.route("unused", &request, &json!({}));
        assert_eq!(route.next, Some(AbhaStep::UpdateMobile));
        assert_eq!(
            transition.targets(),
            vec![AbhaStep::GetAbhaAddressSuggestions, AbhaStep::UpdateMobile]
        );
    }

    #[test]
    fn test_fixed_transitions_use_step_message() {
        let next: Transition<AbhaStep> = Transition::Next(AbhaStep::FinalRegister);
        let route = next.route("ok", &Payload::new(), &json!({}));
        assert_eq!(route, Route::to(AbhaStep::FinalRegister, "ok"));

        let terminal: Transition<AbhaStep> = Transition::Terminal;
        assert_eq!(terminal.route("done", &Payload::new(), &json!({})).next, None);
        assert_eq!(terminal.describe(), "(end)");
    }

    #[test]
    fn test_step_spec_builder() {
        let spec: StepSpec<AbhaStep> = StepSpec::get::<TxnRequest>("abha/address/suggestions")
            .failing_with("Failed to fetch")
            .then("Fetched", Transition::Next(AbhaStep::FinalRegister));

        assert_eq!(spec.method, HttpMethod::Get);
        assert_eq!(spec.request.shape, "TxnRequest");
        assert!(spec.encrypted_fields.is_empty());
        assert!(spec.request.check(&payload(json!({"txnId": "t"}))).is_ok());
        assert!(spec.request.check(&Payload::new()).is_err());
    }
}
