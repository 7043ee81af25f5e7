//! Validate config command implementation

use crate::adapters::encryption::RsaEncryptor;
use crate::config::load_config;
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also load and parse the encryption public key
    #[arg(long)]
    pub check_key: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        if self.check_key {
            match RsaEncryptor::from_config(&config.encryption) {
                Ok(_) => println!("✅ Encryption public key loaded"),
                Err(e) => {
                    println!("❌ Failed to load encryption public key");
                    println!("   Error: {e}");
                    return Ok(2);
                }
            }
        }

        let api_key = match &config.ehr.api_key {
            Some(key) if !key.expose_secret().is_empty() => "configured",
            _ => "not set",
        };
        let key_source = match (&config.encryption.public_key_path, &config.encryption.public_key_pem) {
            (Some(path), _) => path.clone(),
            (None, Some(_)) => "inline PEM".to_string(),
            (None, None) => "none".to_string(),
        };

        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Gateway: {}", config.ehr.base_url);
        println!("  API Key: {api_key}");
        println!(
            "  Client ID: {}",
            config.ehr.client_id.as_deref().unwrap_or("not set")
        );
        println!(
            "  Timeouts: {}s request, {}s connect",
            config.ehr.timeout_seconds, config.ehr.connect_timeout_seconds
        );
        println!("  TLS Verify: {}", config.ehr.tls_verify);
        println!("  Public Key: {key_source}");
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                config.logging.local_path.as_str()
            } else {
                "disabled"
            }
        );
        println!();

        Ok(0)
    }
}
