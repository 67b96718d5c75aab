//! Relay command implementation
//!
//! Runs the side-effect relay in the foreground until shutdown, or for a
//! single pass with `--once`.

use crate::config::load_config;
use crate::core::relay::SideEffectRelay;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the relay command
#[derive(Args, Debug)]
pub struct RelayArgs {
    /// Run a single pass and exit
    #[arg(long)]
    pub once: bool,
}

impl RelayArgs {
    /// Execute the relay command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        if !config.relay.enabled && !self.once {
            println!("⏸️  Relay is disabled (relay.enabled = false)");
            return Ok(0);
        }

        let relay = match SideEffectRelay::from_config(&config).await {
            Ok(r) => r,
            Err(e) => {
                println!("❌ Failed to initialize relay");
                println!("   Error: {e}");
                return Ok(4);
            }
        };

        if self.once {
            println!("🔄 Running a single relay pass");
            return match relay.run_once().await {
                Ok(report) => {
                    println!();
                    println!("Examined:      {}", report.examined);
                    println!("Completed:     {}", report.completed);
                    println!("Still pending: {}", report.still_pending);
                    println!("Removed:       {}", report.removed);
                    for failure in &report.failures {
                        println!("  ⚠️  {} {}: {}", failure.patient_id, failure.step, failure.message);
                    }
                    println!("Duration:      {:.2}s", report.duration.as_secs_f64());
                    Ok(if report.is_clean() { 0 } else { 1 })
                }
                Err(e) => {
                    println!("❌ Relay pass failed");
                    println!("   Error: {e}");
                    Ok(5)
                }
            };
        }

        println!(
            "🔄 Relay running every {}s (Ctrl+C to stop)",
            config.relay.interval_seconds
        );
        match relay.run(shutdown_signal).await {
            Ok(()) => {
                println!("✅ Relay stopped");
                Ok(0)
            }
            Err(e) => {
                println!("❌ Relay failed");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }
}
