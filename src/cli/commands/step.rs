//! Step command implementation
//!
//! Runs a single registration step against the configured gateway and prints
//! the resulting `FlowResult` as JSON on stdout.

use crate::config::load_config;
use crate::core::{HealthIdClient, RawPayload};
use crate::domain::FlowKind;
use anyhow::Context;
use clap::Args;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Arguments for the step command
#[derive(Args, Debug)]
pub struct StepArgs {
    /// Registration flow (abha or hpr)
    #[arg(short, long)]
    pub flow: FlowKind,

    /// Step name or numeric code, e.g. `register_with_aadhaar` or `1`
    #[arg(short, long)]
    pub step: String,

    /// Payload as inline JSON
    #[arg(short, long, conflicts_with = "payload_file")]
    pub payload: Option<String>,

    /// Read the JSON payload from a file
    #[arg(long)]
    pub payload_file: Option<PathBuf>,
}

impl StepArgs {
    /// Execute the step command
    ///
    /// Exit codes: 0 when the step succeeded, 1 when it produced a failed
    /// result, 2 on configuration errors.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let client = match HealthIdClient::new(&config) {
            Ok(client) => client,
            Err(e) => {
                eprintln!("❌ Failed to initialize client: {e}");
                return Ok(2);
            }
        };

        let payload = self.read_payload()?;

        tracing::info!(flow = %self.flow, step = %self.step, "Running registration step");

        let result = client.dispatch(self.flow, &self.step, payload).await;

        println!("{}", serde_json::to_string_pretty(&result)?);

        Ok(if result.is_failure() { 1 } else { 0 })
    }

    fn read_payload(&self) -> anyhow::Result<RawPayload> {
        if let Some(path) = &self.payload_file {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read payload file {}", path.display()))?;
            return Ok(RawPayload::Json(text));
        }

        Ok(match &self.payload {
            Some(text) => RawPayload::Json(text.clone()),
            None => RawPayload::Value(Value::Null),
        })
    }
}
