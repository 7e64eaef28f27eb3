//! Data storage layer
//!
//! - `sqlite` - Connection pool, schema, migrations and repositories
//! - `sql` - Predicate tree to SQLite `WHERE` text with bound parameters
//! - `types` - Row types returned to the API layer
//! - `traits` - `SearchRepository`, the handle injected into handlers
//! - `error` - Unified error type

pub mod error;
pub mod sql;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use error::DataError;
pub use sqlite::SqliteService;
pub use traits::SearchRepository;

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::config::DatabaseConfig;

/// Transactional database service
///
/// Wraps the backend-specific service behind one handle that is opened at
/// startup and closed during shutdown.
pub enum TransactionalService {
    /// SQLite backend (embedded)
    Sqlite(Arc<SqliteService>),
}

impl TransactionalService {
    /// Open the configured database and run migrations
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DataError> {
        if !config.url.starts_with("sqlite:") {
            return Err(DataError::Config(format!(
                "Unsupported database URL '{}': expected a sqlite: URL",
                config.url
            )));
        }
        let service = SqliteService::init(config).await?;
        Ok(Self::Sqlite(Arc::new(service)))
    }

    /// Run a WAL checkpoint
    pub async fn checkpoint(&self) -> Result<(), DataError> {
        match self {
            Self::Sqlite(s) => s.checkpoint().await.map_err(Into::into),
        }
    }

    /// Close the database connection gracefully
    pub async fn close(&self) {
        match self {
            Self::Sqlite(s) => s.close().await,
        }
    }

    /// Start the background checkpoint task
    pub fn start_checkpoint_task(&self, shutdown_rx: watch::Receiver<bool>) -> JoinHandle<()> {
        match self {
            Self::Sqlite(s) => s.start_checkpoint_task(shutdown_rx),
        }
    }

    /// Get the repository trait object for search operations
    pub fn repository(&self) -> Arc<dyn SearchRepository> {
        match self {
            Self::Sqlite(s) => Arc::new(Arc::clone(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_rejects_non_sqlite_url() {
        let config = DatabaseConfig {
            url: "postgres://localhost/nestmate".to_string(),
            max_connections: 1,
            busy_timeout_ms: 100,
        };
        let err = TransactionalService::init(&config).await.err().unwrap();
        assert!(matches!(err, DataError::Config(_)));
    }

    #[tokio::test]
    async fn test_repository_pings() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("test.db").display()),
            max_connections: 1,
            busy_timeout_ms: 100,
        };
        let service = TransactionalService::init(&config).await.unwrap();
        service.repository().ping().await.unwrap();
        service.checkpoint().await.unwrap();
        service.close().await;
    }
}
