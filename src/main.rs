// HealthID Flow - ABHA and HPR registration client
// Copyright (c) 2025 HealthID Flow Contributors
// Licensed under the MIT License

use clap::Parser;
use healthid_flow::cli::{Cli, Commands};
use healthid_flow::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Console logging goes to stderr; stdout carries command output
    let (log_level, logging) = cli.logging_settings();
    let guard = match init_logging(&log_level, &logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(2);
        }
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "healthid starting");

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e:#}");
            1
        }
    };

    drop(guard);
    process::exit(exit_code);
}

async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Step(args) => args.execute(&cli.config).await,
        Commands::Steps(args) => args.execute().await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
