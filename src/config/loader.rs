//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::SdkConfig;
use super::secret::secret_string;
use crate::domain::{Result, SdkError};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into SdkConfig
/// 4. Applies environment variable overrides (HEALTHID_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`SdkError::Configuration`] if the file cannot be read, a
/// referenced variable is unset, parsing fails, an override is malformed or
/// validation fails.
///
/// # Examples
///
/// ```no_run
/// use healthid_flow::config::loader::load_config;
///
/// let config = load_config("healthid.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SdkConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SdkError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SdkError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: SdkConfig = toml::from_str(&contents)
        .map_err(|e| SdkError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        SdkError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. Every missing variable is reported in a
/// single error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| SdkError::Internal(format!("invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        lines.push(processed.into_owned());
    }

    if !missing_vars.is_empty() {
        return Err(SdkError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn parse_override<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        SdkError::Configuration(format!("Invalid value '{value}' for environment variable {name}"))
    })
}

/// Applies environment variable overrides using HEALTHID_* prefix
///
/// Environment variables follow the pattern: HEALTHID_<SECTION>_<KEY>
/// For example: HEALTHID_EHR_BASE_URL, HEALTHID_APPLICATION_LOG_LEVEL
fn apply_env_overrides(config: &mut SdkConfig) -> Result<()> {
    let var = |name: &str| std::env::var(name).ok();

    // Application overrides
    if let Some(val) = var("HEALTHID_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // EHR overrides
    if let Some(val) = var("HEALTHID_EHR_BASE_URL") {
        config.ehr.base_url = val;
    }
    if let Some(val) = var("HEALTHID_EHR_API_KEY") {
        config.ehr.api_key = Some(secret_string(val));
    }
    if let Some(val) = var("HEALTHID_EHR_CLIENT_ID") {
        config.ehr.client_id = Some(val);
    }
    if let Some(val) = var("HEALTHID_EHR_TIMEOUT_SECONDS") {
        config.ehr.timeout_seconds = parse_override("HEALTHID_EHR_TIMEOUT_SECONDS", &val)?;
    }
    if let Some(val) = var("HEALTHID_EHR_TLS_VERIFY") {
        config.ehr.tls_verify = parse_override("HEALTHID_EHR_TLS_VERIFY", &val)?;
    }

    // Encryption overrides
    if let Some(val) = var("HEALTHID_ENCRYPTION_PUBLIC_KEY_PATH") {
        config.encryption.public_key_path = Some(val);
        config.encryption.public_key_pem = None;
    }

    // Logging overrides
    if let Some(val) = var("HEALTHID_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("HEALTHID_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = var("HEALTHID_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

/// Serializes tests that read or mutate `HEALTHID_*` variables
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
