//! Unified error type for the data layer

use thiserror::Error;

use crate::data::sqlite::SqliteError;

/// Error returned across the repository boundary
#[derive(Error, Debug)]
pub enum DataError {
    /// SQLite driver or pool error
    #[error("SQLite error: {0}")]
    Sqlite(sqlx::Error),

    /// Migration failed
    #[error("Migration {version} ({name}) failed: {error}")]
    MigrationFailed {
        version: i32,
        name: String,
        error: String,
    },

    /// A stored value could not be decoded
    #[error("Corrupt value in {column}: {reason}")]
    Corrupt {
        column: &'static str,
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Check if this is a connection-related error that might be transient
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Sqlite(e) => matches!(
                e,
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
            ),
            _ => false,
        }
    }
}

impl From<SqliteError> for DataError {
    fn from(e: SqliteError) -> Self {
        match e {
            SqliteError::Database(e) => Self::Sqlite(e),
            SqliteError::MigrationFailed {
                version,
                name,
                error,
            } => Self::MigrationFailed {
                version,
                name,
                error,
            },
            SqliteError::Io(e) => Self::Io(e),
            SqliteError::Corrupt { column, reason } => Self::Corrupt { column, reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_sqlite_migration_error() {
        let err: DataError = SqliteError::MigrationFailed {
            version: 1,
            name: "initial_schema".to_string(),
            error: "syntax error".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Migration 1 (initial_schema) failed: syntax error"
        );
    }

    #[test]
    fn test_from_sqlite_corrupt() {
        let err: DataError = SqliteError::Corrupt {
            column: "amenities",
            reason: "bad json".to_string(),
        }
        .into();
        assert!(matches!(err, DataError::Corrupt { column: "amenities", .. }));
    }

    #[test]
    fn test_is_transient() {
        assert!(DataError::Sqlite(sqlx::Error::PoolTimedOut).is_transient());
        assert!(DataError::Sqlite(sqlx::Error::PoolClosed).is_transient());
        assert!(!DataError::Sqlite(sqlx::Error::RowNotFound).is_transient());
        assert!(!DataError::Config("bad config".into()).is_transient());
    }
}
