use sqlx::SqlitePool;
use tracing::{info, instrument};

use crate::models::{RepositoryError, RepositoryResult};

/// Name of the single table backing the service
pub const CAFE_TABLE: &str = "cafe";

const CREATE_CAFE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS cafe (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    name           VARCHAR(250) NOT NULL UNIQUE,
    map_url        VARCHAR(500) NOT NULL,
    img_url        VARCHAR(500) NOT NULL,
    location       VARCHAR(250) NOT NULL,
    seats          VARCHAR(250) NOT NULL,
    has_toilet     BOOLEAN NOT NULL,
    has_wifi       BOOLEAN NOT NULL,
    has_sockets    BOOLEAN NOT NULL,
    can_take_calls BOOLEAN NOT NULL,
    coffee_price   VARCHAR(250)
)
"#;

/// Manages creation of the cafe table
pub struct TableManager {
    pool: SqlitePool,
}

impl TableManager {
    /// Create a new table manager
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the cafe table if it does not exist yet
    #[instrument(skip(self))]
    pub async fn create_cafe_table(&self) -> RepositoryResult<()> {
        if self.table_exists(CAFE_TABLE).await? {
            info!("Table {} already exists", CAFE_TABLE);
            return Ok(());
        }

        info!("Creating table {}", CAFE_TABLE);
        sqlx::query(CREATE_CAFE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Schema {
                message: format!("Failed to create table {}: {}", CAFE_TABLE, e),
            })?;

        info!("Table {} created", CAFE_TABLE);
        Ok(())
    }

    /// Check whether a table exists in the database
    pub async fn table_exists(&self, table_name: &str) -> RepositoryResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }
}
