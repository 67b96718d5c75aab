//! Hash password command implementation
//!
//! Reads a password from stdin and prints its bcrypt hash, or checks it
//! against an existing hash with `--verify`.

use crate::config::{load_config, SecurityConfig};
use crate::security::{hash_password, verify_password};
use clap::Args;
use std::io::BufRead;

/// Arguments for the hash-password command
#[derive(Args, Debug)]
pub struct HashPasswordArgs {
    /// bcrypt cost (defaults to security.password_cost)
    #[arg(long)]
    pub cost: Option<u32>,

    /// Verify the password against this hash instead of hashing it
    #[arg(long, value_name = "HASH")]
    pub verify: Option<String>,
}

impl HashPasswordArgs {
    /// Execute the hash-password command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        let password = line.trim_end_matches(['\r', '\n']);

        if password.is_empty() {
            eprintln!("❌ No password read from stdin");
            return Ok(2);
        }

        if let Some(ref hash) = self.verify {
            return Ok(if verify_password(password, hash) {
                println!("✅ Password matches");
                0
            } else {
                println!("❌ Password does not match");
                1
            });
        }

        let cost = self.resolve_cost(config_path);
        match hash_password(password, cost) {
            Ok(hash) => {
                println!("{hash}");
                Ok(0)
            }
            Err(e) => {
                eprintln!("❌ {e}");
                Ok(2)
            }
        }
    }

    fn resolve_cost(&self, config_path: &str) -> u32 {
        if let Some(cost) = self.cost {
            return cost;
        }
        match load_config(config_path) {
            Ok(config) => config.security.password_cost,
            Err(e) => {
                tracing::debug!(error = %e, "Using default password cost");
                SecurityConfig::default().password_cost
            }
        }
    }
}
