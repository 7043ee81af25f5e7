//! Declarative step-request validation
//!
//! Every request shape publishes a static table of [`FieldRule`]s. The
//! validator walks that table against a decoded request and collects every
//! violation instead of stopping at the first one.

use super::payload::Payload;
use crate::domain::{Result, SdkError, ValidationErrors};
use regex::Regex;
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

/// Patterns compiled so far, keyed by their source text
static COMPILED_PATTERNS: OnceLock<RwLock<HashMap<&'static str, Regex>>> = OnceLock::new();

/// Returns the compiled form of `pattern`, compiling it on first use
fn compiled(pattern: &'static str) -> Result<Regex> {
    let cache = COMPILED_PATTERNS.get_or_init(Default::default);

    if let Some(re) = cache.read().ok().and_then(|c| c.get(pattern).cloned()) {
        return Ok(re);
    }

    let re = Regex::new(pattern)
        .map_err(|e| SdkError::Internal(format!("invalid field pattern {pattern}: {e}")))?;
    if let Ok(mut c) = cache.write() {
        c.insert(pattern, re.clone());
    }
    Ok(re)
}

/// Format constraint on a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    /// Exactly `n` ASCII digits
    Digits(usize),
    /// Full-match regular expression with a readable description
    Pattern {
        regex: &'static str,
        description: &'static str,
    },
}

impl FieldFormat {
    fn check(&self, value: &str) -> Result<Option<String>> {
        match self {
            FieldFormat::Digits(n) => {
                let ok = value.len() == *n && value.chars().all(|c| c.is_ascii_digit());
                Ok((!ok).then(|| format!("must be exactly {n} digits")))
            }
            FieldFormat::Pattern { regex, description } => {
                let re = compiled(regex)?;
                Ok((!re.is_match(value)).then(|| format!("must be {description}")))
            }
        }
    }
}

/// Constraint declaration for one payload key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub required: bool,
    pub format: Option<FieldFormat>,
}

impl FieldRule {
    pub const fn required(field: &'static str) -> Self {
        Self {
            field,
            required: true,
            format: None,
        }
    }

    pub const fn optional(field: &'static str) -> Self {
        Self {
            field,
            required: false,
            format: None,
        }
    }

    pub const fn format(self, format: FieldFormat) -> Self {
        Self {
            field: self.field,
            required: self.required,
            format: Some(format),
        }
    }
}

/// A typed step request decoded from a normalized payload
pub trait StepRequest: Sized {
    /// Shape name reported to callers as `nextStepPayloadShape`
    const SHAPE: &'static str;

    /// What a caller must put in the payload for this shape
    const HINT: &'static str;

    /// Field constraints in declaration order
    fn rules() -> &'static [FieldRule];

    /// Reads the named keys, defaulting absent values
    fn decode(payload: &Payload) -> Self;

    /// Value of a field by payload key, `None` when absent
    fn field(&self, name: &str) -> Option<&str>;
}

/// Checks a decoded request against its shape's rules
///
/// # Errors
///
/// Returns [`SdkError::Validation`] listing every violated rule.
pub fn validate<R: StepRequest>(request: &R) -> Result<()> {
    let mut errors = ValidationErrors::new();

    for rule in R::rules() {
        let value = request.field(rule.field).map(str::trim).unwrap_or_default();

        if value.is_empty() {
            if rule.required {
                errors.push(rule.field, "is required");
            }
            continue;
        }

        if let Some(format) = &rule.format {
            if let Some(message) = format.check(value)? {
                errors.push(rule.field, message);
            }
        }
    }

    errors.into_result()
}

/// Decodes and validates a payload as shape `R`
pub fn check_payload<R: StepRequest>(payload: &Payload) -> Result<R> {
    let request = R::decode(payload);
    validate(&request)?;
    Ok(request)
}
