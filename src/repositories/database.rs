use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info, instrument};

use crate::config::DatabaseConfig;
use crate::models::{RepositoryError, RepositoryResult};

/// Open the SQLite connection pool described by `config`.
///
/// The database file is created when missing. File-backed databases run in WAL mode.
#[instrument(skip(config), fields(database_url = %config.database_url))]
pub async fn create_pool(config: &DatabaseConfig) -> RepositoryResult<SqlitePool> {
    info!("Opening SQLite connection pool");

    let mut options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(|e| RepositoryError::Schema {
            message: format!("Invalid database url {}: {}", config.database_url, e),
        })?
        .create_if_missing(true)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms));

    if !is_in_memory(&config.database_url) {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .map_err(|e| {
            error!("Failed to open database: {}", e);
            RepositoryError::ConnectionFailed
        })?;

    info!(
        max_connections = config.max_connections,
        "Database connection established"
    );
    Ok(pool)
}

/// A private in-memory database lives and dies with a single connection
pub fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_in_memory() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file:cafes?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://cafes.db"));
    }

    #[tokio::test]
    async fn test_create_in_memory_pool() {
        let config = DatabaseConfig {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            busy_timeout_ms: 1000,
        };

        let pool = create_pool(&config).await.unwrap();
        let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await.unwrap();
        assert_eq!(one, 1);
    }
}
