//! Init command implementation
//!
//! Writes a starter `healthid.toml`.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "healthid.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::starter_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your gateway URL and client ID", self.output);
                println!("  2. Put the gateway's public key PEM at the configured path");
                println!("  3. Export HEALTHID_API_KEY (or add it to a .env file)");
                println!("  4. Validate configuration: healthid validate-config --check-key");
                println!("  5. Start a registration: healthid step --flow abha --step 1 --payload '{{\"aadhaar\":\"...\"}}'");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(2)
            }
        }
    }

    fn starter_config() -> &'static str {
        r#"# healthid configuration
#
# Values of the form ${VAR} are read from the environment (or a .env file).
# Any setting can also be overridden with HEALTHID_<SECTION>_<KEY>.

# development | staging | production
environment = "development"

[application]
# trace, debug, info, warn, error (--log-level overrides it).
# Logs go to stderr; `step` prints only its JSON result on stdout.
log_level = "info"

[ehr]
# Base URL every step endpoint is resolved against
base_url = "https://gateway.example.com/api/v3"
api_key = "${HEALTHID_API_KEY}"
client_id = "your-client-id"
timeout_seconds = 30
connect_timeout_seconds = 10
# Cannot be disabled in production
tls_verify = true

[encryption]
# PEM public key of the identity gateway (SPKI or PKCS#1).
# Set exactly one of public_key_path / public_key_pem.
public_key_path = "keys/gateway-public.pem"

[logging]
# JSON log files, written by the `step` and `validate-config` commands
local_enabled = false
local_path = "./logs"
# daily | hourly | never
local_rotation = "daily"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SdkConfig;
    use tempfile::TempDir;

    #[test]
    fn test_starter_config_parses() {
        let contents = InitArgs::starter_config().replace("${HEALTHID_API_KEY}", "token");
        let config: SdkConfig = toml::from_str(&contents).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.ehr.timeout_seconds, 30);
    }

    #[tokio::test]
    async fn test_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("healthid.toml");
        fs::write(&output, "existing").unwrap();

        let mut args = InitArgs {
            output: output.to_string_lossy().to_string(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&output).unwrap(), "existing");

        args.force = true;
        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&output).unwrap().contains("[encryption]"));
    }
}
