//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{EventTarget, PatientServiceConfig, StoreTarget};
use super::secret::secret_string;
use crate::domain::errors::PatientError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "PATIENT_";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into PatientServiceConfig
/// 4. Applies environment variable overrides (PATIENT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use patient_service::config::loader::load_config;
///
/// let config = load_config("patient-service.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PatientServiceConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PatientError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PatientError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses, overrides and validates configuration from TOML text
pub fn parse_config(contents: &str) -> Result<PatientServiceConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: PatientServiceConfig = toml::from_str(&contents)
        .map_err(|e| PatientError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        PatientError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. All missing variables are reported together.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| PatientError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    cap[0].to_string()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(PatientError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{key}")).ok()
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match env(key) {
        Some(raw) => raw.parse().map(Some).map_err(|_| {
            PatientError::Configuration(format!(
                "Invalid value '{raw}' for environment variable {ENV_PREFIX}{key}"
            ))
        }),
        None => Ok(None),
    }
}

/// Applies environment variable overrides using the PATIENT_* prefix
///
/// Environment variables follow the pattern: PATIENT_<SECTION>_<KEY>
/// For example: PATIENT_BILLING_ENDPOINT, PATIENT_EVENTS_TOPIC
fn apply_env_overrides(config: &mut PatientServiceConfig) -> Result<()> {
    if let Some(val) = env("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Some(val) = env("STORE_TARGET") {
        config.store.target = match val.to_ascii_lowercase().as_str() {
            "postgresql" | "postgres" => StoreTarget::PostgreSQL,
            "memory" => StoreTarget::Memory,
            other => {
                return Err(PatientError::Configuration(format!(
                    "Invalid {ENV_PREFIX}STORE_TARGET '{other}'"
                )))
            }
        };
    }

    if let Some(ref mut pg) = config.postgresql {
        if let Some(val) = env("POSTGRESQL_CONNECTION_STRING") {
            pg.connection_string = secret_string(val);
        }
        if let Some(val) = env_parse("POSTGRESQL_MAX_CONNECTIONS")? {
            pg.max_connections = val;
        }
    }

    if let Some(val) = env("BILLING_ENDPOINT") {
        config.billing.endpoint = val;
    }
    if let Some(val) = env_parse("BILLING_TIMEOUT_SECONDS")? {
        config.billing.timeout_seconds = val;
    }
    if let Some(val) = env_parse("BILLING_RETRY_MAX_RETRIES")? {
        config.billing.retry.max_retries = val;
    }

    if let Some(val) = env("EVENTS_TARGET") {
        config.events.target = match val.to_ascii_lowercase().as_str() {
            "kafka_rest" => EventTarget::KafkaRest,
            "channel" => EventTarget::Channel,
            other => {
                return Err(PatientError::Configuration(format!(
                    "Invalid {ENV_PREFIX}EVENTS_TARGET '{other}'"
                )))
            }
        };
    }
    if let Some(val) = env("EVENTS_BASE_URL") {
        config.events.base_url = Some(val);
    }
    if let Some(val) = env("EVENTS_TOPIC") {
        config.events.topic = val;
    }
    if let Some(val) = env("EVENTS_USERNAME") {
        config.events.username = Some(val);
    }
    if let Some(val) = env("EVENTS_PASSWORD") {
        config.events.password = Some(secret_string(val));
    }
    if let Some(val) = env_parse("EVENTS_RETRY_MAX_RETRIES")? {
        config.events.retry.max_retries = val;
    }

    if let Some(val) = env_parse("CACHE_ENABLED")? {
        config.cache.enabled = val;
    }
    if let Some(val) = env_parse("CACHE_TTL_SECONDS")? {
        config.cache.ttl_seconds = val;
    }

    if let Some(val) = env_parse("QUERY_MAX_PAGE_SIZE")? {
        config.query.max_page_size = val;
    }

    if let Some(val) = env_parse("RELAY_ENABLED")? {
        config.relay.enabled = val;
    }
    if let Some(val) = env_parse("RELAY_INTERVAL_SECONDS")? {
        config.relay.interval_seconds = val;
    }

    if let Some(val) = env_parse("SECURITY_PASSWORD_COST")? {
        config.security.password_cost = val;
    }

    if let Some(val) = env_parse("LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = val;
    }
    if let Some(val) = env("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
