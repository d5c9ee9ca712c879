use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

use crate::repository::{AssessmentRepository, HistoryRepository, Storage};

mod assessment_repo;
mod history_repo;
mod mapping;
mod migrate;

#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A private in-memory database lives and dies with its one connection.
fn is_private_memory(database_url: &str) -> bool {
    database_url.contains(":memory:")
        || (database_url.contains("mode=memory") && !database_url.contains("cache=shared"))
}

impl SqliteRepository {
    /// Connect to `SQLite` using the given URL, creating the file if needed.
    ///
    /// Private in-memory URLs get a single long-lived connection so every
    /// query sees the same database.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the URL is malformed or the connection
    /// cannot be established.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool_options = SqlitePoolOptions::new().acquire_timeout(BUSY_TIMEOUT);
        let pool_options = if is_private_memory(database_url) {
            pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(5)
        };
        let pool = pool_options.connect_with(options).await?;
        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if migration queries fail.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }
}

impl Storage {
    /// Build a `Storage` backed by `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connection or migrations cannot be
    /// completed.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let repo = SqliteRepository::connect(database_url).await?;
        repo.migrate().await?;
        let assessments: Arc<dyn AssessmentRepository> = Arc::new(repo.clone());
        let history: Arc<dyn HistoryRepository> = Arc::new(repo);
        Ok(Self {
            assessments,
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SqliteRepository>();
    }

    #[test]
    fn only_unshared_memory_urls_are_private() {
        assert!(is_private_memory("sqlite::memory:"));
        assert!(is_private_memory("sqlite:file:x?mode=memory"));
        assert!(!is_private_memory("sqlite:file:x?mode=memory&cache=shared"));
        assert!(!is_private_memory("sqlite:///tmp/assess.sqlite3"));
    }

    #[tokio::test]
    async fn busy_timeout_is_applied_to_connections() {
        let repo = SqliteRepository::connect("sqlite:file:memdb_pragmas?mode=memory&cache=shared")
            .await
            .unwrap();
        let timeout: i64 = sqlx::query_scalar("PRAGMA busy_timeout")
            .fetch_one(repo.pool())
            .await
            .unwrap();
        assert_eq!(timeout, 5000);
    }
}
