//! CLI interface and argument parsing

pub mod commands;

use clap::{Parser, Subcommand};

/// Patient Service - patient records with billing and event side effects
#[derive(Parser, Debug)]
#[command(name = "patient-service")]
#[command(version, about, long_about = None)]
#[command(author = "Patient Service Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "patient-service.toml",
        env = "PATIENT_SERVICE_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PATIENT_SERVICE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Complete pending billing provisioning and event emission
    Relay(commands::relay::RelayArgs),

    /// Show patients with pending side effects
    Status(commands::status::StatusArgs),

    /// Hash a password read from stdin, or verify it against a hash
    HashPassword(commands::hash_password::HashPasswordArgs),
}
