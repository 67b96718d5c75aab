//! Status command implementation
//!
//! Lists patients whose billing or event step is still outstanding.

use crate::adapters::store::create_patient_store;
use crate::config::load_config;
use chrono::Utc;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Maximum number of pending patients to list
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking pending side effects");

        println!("📊 Side Effect Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let store = match create_patient_store(&config).await {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to connect to {:?} store", config.store.target);
                println!("   Error: {e}");
                return Ok(4);
            }
        };

        let pending = match store.find_pending_side_effects(Utc::now(), self.limit).await {
            Ok(p) => p,
            Err(e) => {
                println!("❌ Failed to load pending patients");
                println!("   Error: {e}");
                return Ok(5);
            }
        };

        if pending.is_empty() {
            println!("✅ No patients with pending side effects.");
            return Ok(0);
        }

        println!("Found {} pending patient(s):", pending.len());
        println!();
        println!(
            "{:<38} {:<22} {:<16} {:<10}",
            "Patient ID", "Created", "Billing", "Event"
        );
        println!("{}", "-".repeat(90));

        for patient in pending {
            let billing = match patient.billing_account {
                Some(ref account) => format!("✅ {}", account.status),
                None => "⏳ Pending".to_string(),
            };
            let event = if patient.event_published {
                "✅ Sent"
            } else {
                "⏳ Pending"
            };

            println!(
                "{:<38} {:<22} {:<16} {:<10}",
                patient.id.to_string(),
                patient.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                billing,
                event
            );
        }

        println!();
        println!("Run 'patient-service relay --once' to retry them.");
        Ok(0)
    }
}
