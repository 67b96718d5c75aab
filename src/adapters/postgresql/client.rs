//! PostgreSQL client implementation
//!
//! Connection pooling, schema setup and statement execution with a
//! per-connection statement timeout.

use crate::config::schema::PostgreSQLConfig;
use crate::domain::{PatientError, Result, StorageError};
use deadpool_postgres::{
    Manager, ManagerConfig, Object, Pool, RecyclingMethod, Runtime, Status,
};
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::error::SqlState;
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Row};

const MIGRATION_SQL: &str = include_str!("../../../migrations/001_patients.sql");

/// Statement parameters
pub type Params<'a> = &'a [&'a (dyn ToSql + Sync)];

/// PostgreSQL client
pub struct PostgreSQLClient {
    pool: Pool,
    config: PostgreSQLConfig,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// The pool connects lazily; call [`test_connection`](Self::test_connection)
    /// to verify reachability.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is invalid or the pool cannot be built.
    pub async fn new(config: PostgreSQLConfig) -> Result<Self> {
        let pg_config: tokio_postgres::Config = config
            .connection_string
            .expose_secret()
            .as_str()
            .parse()
            .map_err(|e| {
                PatientError::Configuration(format!("Invalid PostgreSQL connection string: {e}"))
            })?;

        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let timeout = Duration::from_secs(config.connection_timeout_seconds);
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .runtime(Runtime::Tokio1)
            .wait_timeout(Some(timeout))
            .create_timeout(Some(timeout))
            .recycle_timeout(Some(timeout))
            .build()
            .map_err(|e| {
                StorageError::ConnectionFailed(format!("Failed to create connection pool: {e}"))
            })?;

        tracing::debug!(
            target_db = %redact_connection_string(config.connection_string.expose_secret().as_str()),
            max_connections = config.max_connections,
            "PostgreSQL pool created"
        );

        Ok(Self { pool, config })
    }

    /// Test the connection to PostgreSQL
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.get_connection().await?;

        client.query_one("SELECT 1", &[]).await.map_err(|e| {
            StorageError::ConnectionFailed(format!("Connection test failed: {e}"))
        })?;

        tracing::info!("PostgreSQL connection test successful");
        Ok(())
    }

    /// Create the patients table and indexes if they don't exist
    pub async fn ensure_schema(&self) -> Result<()> {
        let client = self.get_connection().await?;

        client
            .batch_execute(MIGRATION_SQL)
            .await
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;

        tracing::info!("PostgreSQL schema initialized successfully");
        Ok(())
    }

    /// Get a connection from the pool with the statement timeout applied
    pub async fn get_connection(&self) -> Result<Object> {
        let client = self.pool.get().await.map_err(|e| {
            StorageError::ConnectionFailed(format!("Failed to get connection from pool: {e}"))
        })?;

        let timeout_query = format!(
            "SET statement_timeout = {}",
            self.config.statement_timeout_seconds * 1000
        );
        client.batch_execute(&timeout_query).await.map_err(|e| {
            StorageError::ConnectionFailed(format!("Failed to set statement timeout: {e}"))
        })?;

        Ok(client)
    }

    /// Execute a query and return rows
    pub async fn query(&self, query: &str, params: Params<'_>) -> Result<Vec<Row>> {
        self.query_with(query, params, |e| {
            StorageError::QueryFailed(e.to_string()).into()
        })
        .await
    }

    /// Execute a query, mapping database errors with `map_err`
    pub async fn query_with<F>(&self, query: &str, params: Params<'_>, map_err: F) -> Result<Vec<Row>>
    where
        F: FnOnce(tokio_postgres::Error) -> PatientError,
    {
        let client = self.get_connection().await?;
        client.query(query, params).await.map_err(map_err)
    }

    /// Execute a statement and return the number of affected rows
    pub async fn execute(&self, statement: &str, params: Params<'_>) -> Result<u64> {
        let client = self.get_connection().await?;
        client
            .execute(statement, params)
            .await
            .map_err(|e| StorageError::WriteFailed(e.to_string()).into())
    }

    /// Connection string with credentials removed
    pub fn connection_string_safe(&self) -> String {
        redact_connection_string(self.config.connection_string.expose_secret().as_str())
    }

    /// Pool statistics
    pub fn pool_status(&self) -> Status {
        self.pool.status()
    }
}

/// Returns true if the error is a unique constraint violation
pub fn is_unique_violation(err: &tokio_postgres::Error) -> bool {
    err.code() == Some(&SqlState::UNIQUE_VIOLATION)
}

/// Hides credentials in a PostgreSQL connection string
pub fn redact_connection_string(conn: &str) -> String {
    match conn.rsplit_once('@') {
        Some((_, host)) => format!("postgresql://***@{host}"),
        None => conn.to_string(),
    }
}
