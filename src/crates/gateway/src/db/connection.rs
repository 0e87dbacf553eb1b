//! Database connection management
//!
//! Provides the SQLite connection pool, migrations and health checks.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::sync::Arc;

use super::error::DbResult;

/// Type alias for the database connection pool
pub type DatabasePool = SqlitePool;

/// Database connection wrapper
#[derive(Clone)]
pub struct DatabaseConnection {
    pool: Arc<DatabasePool>,
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

impl DatabaseConnection {
    /// Create a new database connection with the default pool size
    ///
    /// # Arguments
    /// * `database_url` - SQLite connection string (e.g., "sqlite://gateway.db?mode=rwc" or "sqlite::memory:")
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        Self::with_max_connections(database_url, 5).await
    }

    /// Create a new database connection with custom pool size
    ///
    /// In-memory databases live and die with their connection, so they are
    /// pinned to a single connection that is never recycled.
    pub async fn with_max_connections(
        database_url: &str,
        max_connections: u32,
    ) -> Result<Self, sqlx::Error> {
        let options = if is_memory_url(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };

        let pool = options.connect(database_url).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Fresh migrated in-memory database
    pub async fn in_memory() -> DbResult<Self> {
        let db = Self::new("sqlite::memory:").await?;
        db.run_migrations().await?;
        Ok(db)
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Apply pending migrations from `./migrations`
    pub async fn run_migrations(&self) -> DbResult<()> {
        sqlx::migrate!("./migrations").run(self.pool.as_ref()).await?;
        Ok(())
    }

    /// Perform a health check by running a simple query
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").fetch_one(self.pool.as_ref()).await?;
        Ok(())
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_connection() {
        let conn = DatabaseConnection::new("sqlite::memory:").await.unwrap();
        assert!(conn.pool().acquire().await.is_ok());
    }

    #[tokio::test]
    async fn test_health_check_success() {
        let conn = DatabaseConnection::new("sqlite::memory:").await.unwrap();
        assert!(conn.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_in_memory_runs_migrations() {
        let conn = DatabaseConnection::in_memory().await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'orchestration_runs') ORDER BY name",
        )
        .fetch_all(conn.pool())
        .await
        .unwrap();

        let names: Vec<_> = tables.into_iter().map(|(name,)| name).collect();
        assert_eq!(names, vec!["orchestration_runs", "users"]);
    }

    #[tokio::test]
    async fn test_health_check_after_close() {
        let conn = DatabaseConnection::new("sqlite::memory:").await.unwrap();
        conn.close().await;
        assert!(conn.health_check().await.is_err());
    }

    #[test]
    fn test_is_memory_url() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite://file:test?mode=memory&cache=shared"));
        assert!(!is_memory_url("sqlite://gateway.db?mode=rwc"));
    }
}
