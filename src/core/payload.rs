//! Payload normalization
//!
//! Callers hand the flow engine whatever they have: a JSON object, a JSON
//! string, or a typed request struct. Everything is turned into one uniform
//! key/value map before validation and transmission. Unknown keys are kept.

use crate::domain::{Result, SdkError};
use serde::Serialize;
use serde_json::{Map, Value};

/// Uniform key/value form of a step payload
pub type Payload = Map<String, Value>;

/// Raw input accepted by `dispatch`
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    /// Already a key/value map
    Map(Payload),
    /// JSON-encoded text
    Json(String),
    /// Any JSON value; only objects and `null` are accepted
    Value(Value),
    /// A typed value that could not be serialized
    Invalid(String),
}

impl RawPayload {
    /// Builds a payload from any serializable value, e.g. a step request struct
    pub fn typed<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => RawPayload::Value(value),
            Err(e) => RawPayload::Invalid(e.to_string()),
        }
    }
}

impl From<Payload> for RawPayload {
    fn from(map: Payload) -> Self {
        RawPayload::Map(map)
    }
}

impl From<Value> for RawPayload {
    fn from(value: Value) -> Self {
        RawPayload::Value(value)
    }
}

impl From<Option<Value>> for RawPayload {
    fn from(value: Option<Value>) -> Self {
        RawPayload::Value(value.unwrap_or(Value::Null))
    }
}

impl From<String> for RawPayload {
    fn from(text: String) -> Self {
        RawPayload::Json(text)
    }
}

impl From<&str> for RawPayload {
    fn from(text: &str) -> Self {
        RawPayload::Json(text.to_string())
    }
}

/// Converts a raw payload into a key/value map
///
/// # Errors
///
/// Returns [`SdkError::MalformedPayload`] for invalid JSON text, JSON that is
/// not an object, or a typed value that failed to serialize.
pub fn normalize(raw: RawPayload) -> Result<Payload> {
    match raw {
        RawPayload::Map(map) => Ok(map),
        RawPayload::Json(text) => {
            let value: Value = serde_json::from_str(&text)
                .map_err(|e| SdkError::MalformedPayload(format!("invalid JSON: {e}")))?;
            match value {
                Value::Object(map) => Ok(map),
                other => Err(SdkError::MalformedPayload(format!(
                    "expected a JSON object, got {}",
                    kind_of(&other)
                ))),
            }
        }
        RawPayload::Value(Value::Object(map)) => Ok(map),
        RawPayload::Value(Value::Null) => Ok(Payload::new()),
        RawPayload::Value(other) => Err(SdkError::MalformedPayload(format!(
            "expected an object, got {}",
            kind_of(&other)
        ))),
        RawPayload::Invalid(reason) => Err(SdkError::MalformedPayload(reason)),
    }
}

/// Reads a scalar value as text
///
/// Strings are returned verbatim, numbers and booleans as their JSON text.
/// `null`, arrays and objects yield `None`.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads a named key as text, defaulting to an empty string
pub fn text_field(payload: &Payload, key: &str) -> String {
    payload.get(key).and_then(scalar_text).unwrap_or_default()
}

/// Reads a named key as text, `None` when absent or blank
pub fn optional_text_field(payload: &Payload, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(scalar_text)
        .filter(|s| !s.trim().is_empty())
}

/// Safe navigation through nested objects
///
/// Never fails: any missing segment or non-object intermediate yields `None`.
pub fn json_path<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, segment| current.as_object()?.get(*segment))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_map_is_unchanged() {
        let mut map = Payload::new();
        map.insert("aadhaar".to_string(), json!("123456789012"));
        map.insert("extra".to_string(), json!({"nested": true}));

        let normalized = normalize(RawPayload::from(map.clone())).unwrap();
        assert_eq!(normalized, map);
    }

    #[test]
    fn test_normalize_json_string() {
        let normalized = normalize(r#"{"otp":"000000","txnId":"t1"}"#.into()).unwrap();
        assert_eq!(normalized["otp"], "000000");
        assert_eq!(normalized["txnId"], "t1");
    }

    #[test]
    fn test_normalize_invalid_json_string() {
        let err = normalize("{not json".into()).unwrap_err();
        assert!(matches!(err, SdkError::MalformedPayload(_)));
    }

    #[test]
    fn test_normalize_json_string_that_is_not_an_object() {
        let err = normalize("[1, 2, 3]".into()).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_normalize_null_is_empty_map() {
        assert!(normalize(Value::Null.into()).unwrap().is_empty());
        assert!(normalize(None::<Value>.into()).unwrap().is_empty());
    }

    #[test]
    fn test_normalize_rejects_scalars() {
        assert!(normalize(json!(42).into()).is_err());
        assert!(normalize(json!("text").into()).is_err());
    }

    #[test]
    fn test_normalize_typed_struct_keeps_all_fields() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Custom {
            txn_id: String,
            mobile: String,
        }

        let raw = RawPayload::typed(&Custom {
            txn_id: "t1".to_string(),
            mobile: "9876543210".to_string(),
        });
        let normalized = normalize(raw).unwrap();
        assert_eq!(normalized["txnId"], "t1");
        assert_eq!(normalized["mobile"], "9876543210");
    }

    #[test]
    fn test_text_field_stringifies_numbers() {
        let map = normalize(json!({"aadhaar": 123456789012u64, "flag": true}).into()).unwrap();
        assert_eq!(text_field(&map, "aadhaar"), "123456789012");
        assert_eq!(text_field(&map, "flag"), "true");
        assert_eq!(text_field(&map, "missing"), "");
    }

    #[test]
    fn test_optional_text_field_skips_blank() {
        let map = normalize(json!({"preferred": "  ", "email": "a@b.in"}).into()).unwrap();
        assert_eq!(optional_text_field(&map, "preferred"), None);
        assert_eq!(optional_text_field(&map, "email"), Some("a@b.in".to_string()));
    }

    #[test]
    fn test_json_path_is_total() {
        let value = json!({"ABHAProfile": {"mobile": "9876543210"}, "list": [1]});
        assert_eq!(
            json_path(&value, &["ABHAProfile", "mobile"]),
            Some(&json!("9876543210"))
        );
        assert_eq!(json_path(&value, &["ABHAProfile", "missing"]), None);
        assert_eq!(json_path(&value, &["list", "0"]), None);
        assert_eq!(json_path(&json!(null), &["a"]), None);
        assert_eq!(json_path(&value, &[]), Some(&value));
    }
}
