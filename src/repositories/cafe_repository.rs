use async_trait::async_trait;
use sqlx::SqlitePool;
use std::future::Future;
use std::sync::Arc;
use tracing::{instrument, Instrument};

use super::table_manager::CAFE_TABLE;
use crate::models::{Cafe, NewCafe, RepositoryError, RepositoryResult};
use crate::observability::{DatabaseTracingMiddleware, Metrics};

/// Trait defining the interface for cafe data access operations
#[async_trait]
pub trait CafeRepository: Send + Sync {
    /// Count all cafes
    async fn count(&self) -> RepositoryResult<i64>;

    /// Fetch the cafe at `offset` in id order
    async fn find_at_offset(&self, offset: i64) -> RepositoryResult<Option<Cafe>>;

    /// Fetch every cafe in id order
    async fn find_all(&self) -> RepositoryResult<Vec<Cafe>>;

    /// Fetch the lowest-id cafe whose location equals `location` exactly
    async fn find_first_by_location(&self, location: &str) -> RepositoryResult<Option<Cafe>>;

    /// Find a cafe by its ID
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Cafe>>;

    /// Insert a new cafe, returning the id assigned by the store
    async fn create(&self, cafe: NewCafe) -> RepositoryResult<i64>;

    /// Set `coffee_price` on a cafe. Returns false when no cafe has that id.
    async fn update_coffee_price(&self, id: i64, price: &str) -> RepositoryResult<bool>;

    /// Delete a cafe. Returns false when no cafe has that id.
    async fn delete(&self, id: i64) -> RepositoryResult<bool>;
}

/// SQLite implementation of the CafeRepository trait
pub struct SqliteCafeRepository {
    pool: SqlitePool,
    tracer: Option<DatabaseTracingMiddleware>,
}

impl SqliteCafeRepository {
    /// Create a new SQLite cafe repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool, tracer: None }
    }

    /// Record every store call in the given metrics registry
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.tracer = Some(DatabaseTracingMiddleware::new(metrics));
        self
    }

    fn create_db_span(&self, operation: &str) -> tracing::Span {
        tracing::info_span!(
            "SQLite",
            "otel.kind" = "client",
            "otel.name" = format!("SQLite.{}", operation),
            "db.system" = "sqlite",
            "db.operation" = operation,
            "db.sql.table" = CAFE_TABLE,
            "component" = "sqlx",
        )
    }

    async fn run<F, T>(&self, operation: &str, query: F) -> RepositoryResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        let span = self.create_db_span(operation);
        let future = async { query.await.map_err(RepositoryError::from) };

        match &self.tracer {
            Some(tracer) => {
                tracer
                    .trace_operation(operation, CAFE_TABLE, future)
                    .instrument(span)
                    .await
            }
            None => future.instrument(span).await,
        }
    }
}

#[async_trait]
impl CafeRepository for SqliteCafeRepository {
    #[instrument(skip(self))]
    async fn count(&self) -> RepositoryResult<i64> {
        self.run(
            "count",
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cafe").fetch_one(&self.pool),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn find_at_offset(&self, offset: i64) -> RepositoryResult<Option<Cafe>> {
        self.run(
            "find_at_offset",
            sqlx::query_as::<_, Cafe>(
                "SELECT id, name, map_url, img_url, location, seats, has_toilet, has_wifi, \
                 has_sockets, can_take_calls, coffee_price FROM cafe ORDER BY id LIMIT 1 OFFSET ?",
            )
            .bind(offset)
            .fetch_optional(&self.pool),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepositoryResult<Vec<Cafe>> {
        self.run(
            "find_all",
            sqlx::query_as::<_, Cafe>(
                "SELECT id, name, map_url, img_url, location, seats, has_toilet, has_wifi, \
                 has_sockets, can_take_calls, coffee_price FROM cafe ORDER BY id",
            )
            .fetch_all(&self.pool),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn find_first_by_location(&self, location: &str) -> RepositoryResult<Option<Cafe>> {
        self.run(
            "find_first_by_location",
            sqlx::query_as::<_, Cafe>(
                "SELECT id, name, map_url, img_url, location, seats, has_toilet, has_wifi, \
                 has_sockets, can_take_calls, coffee_price FROM cafe WHERE location = ? \
                 ORDER BY id LIMIT 1",
            )
            .bind(location)
            .fetch_optional(&self.pool),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Cafe>> {
        self.run(
            "find_by_id",
            sqlx::query_as::<_, Cafe>(
                "SELECT id, name, map_url, img_url, location, seats, has_toilet, has_wifi, \
                 has_sockets, can_take_calls, coffee_price FROM cafe WHERE id = ?",
            )
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    #[instrument(skip(self, cafe), fields(name = %cafe.display_name()))]
    async fn create(&self, cafe: NewCafe) -> RepositoryResult<i64> {
        let result = self
            .run(
                "create",
                sqlx::query(
                    "INSERT INTO cafe (name, map_url, img_url, location, seats, has_toilet, \
                     has_wifi, has_sockets, can_take_calls, coffee_price) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(cafe.name)
                .bind(cafe.map_url)
                .bind(cafe.img_url)
                .bind(cafe.location)
                .bind(cafe.seats)
                .bind(cafe.has_toilet)
                .bind(cafe.has_wifi)
                .bind(cafe.has_sockets)
                .bind(cafe.can_take_calls)
                .bind(cafe.coffee_price)
                .execute(&self.pool),
            )
            .await?;

        Ok(result.last_insert_rowid())
    }

    #[instrument(skip(self))]
    async fn update_coffee_price(&self, id: i64, price: &str) -> RepositoryResult<bool> {
        let result = self
            .run(
                "update_coffee_price",
                sqlx::query("UPDATE cafe SET coffee_price = ? WHERE id = ?")
                    .bind(price)
                    .bind(id)
                    .execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let result = self
            .run(
                "delete",
                sqlx::query("DELETE FROM cafe WHERE id = ?")
                    .bind(id)
                    .execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
