//! Validate config command implementation

use crate::adapters::postgresql::client::redact_connection_string;
use crate::config::{load_config, EventTarget, StoreTarget};
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// `load_config` validates as part of loading, so a loaded config is a valid one.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);

        match config.store.target {
            StoreTarget::Memory => println!("  Store: in-memory"),
            StoreTarget::PostgreSQL => {
                if let Some(ref pg) = config.postgresql {
                    println!("  Store: PostgreSQL");
                    println!(
                        "  PostgreSQL Connection: {}",
                        redact_connection_string(pg.connection_string.expose_secret().as_str())
                    );
                    println!("  Max Connections: {}", pg.max_connections);
                }
            }
        }

        println!("  Billing Endpoint: {}", config.billing.endpoint);
        println!(
            "  Billing Retries: {} (timeout {}s)",
            config.billing.retry.max_retries, config.billing.timeout_seconds
        );

        match config.events.target {
            EventTarget::KafkaRest => println!(
                "  Events: Kafka REST {} (topic {})",
                config.events.base_url.as_deref().unwrap_or("<unset>"),
                config.events.topic
            ),
            EventTarget::Channel => println!("  Events: in-process channel"),
        }

        if config.cache.enabled {
            println!(
                "  Cache: {} entries, ttl {}s",
                config.cache.max_entries, config.cache.ttl_seconds
            );
        } else {
            println!("  Cache: disabled");
        }
        println!("  Max Page Size: {}", config.query.max_page_size);
        println!(
            "  Relay: {} (every {}s, batch {})",
            if config.relay.enabled { "enabled" } else { "disabled" },
            config.relay.interval_seconds,
            config.relay.batch_size
        );
        println!();
        Ok(0)
    }
}
