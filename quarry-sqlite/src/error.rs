//! Error types for SQLite operations.

use quarry_query::OrmError;
use thiserror::Error;

/// Result type for SQLite operations.
pub type SqliteResult<T> = Result<T, SqliteError>;

/// Error type for SQLite operations.
#[derive(Error, Debug)]
pub enum SqliteError {
    /// SQLite driver error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] tokio_rusqlite::Error),

    /// Pool error.
    #[error("Pool error: {0}")]
    Pool(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A column value has no ORM equivalent.
    #[error("Type conversion error: {0}")]
    TypeConversion(String),
}

impl SqliteError {
    /// Create a pool error.
    pub fn pool(msg: impl Into<String>) -> Self {
        Self::Pool(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a type conversion error.
    pub fn type_conversion(msg: impl Into<String>) -> Self {
        Self::TypeConversion(msg.into())
    }
}

impl From<rusqlite::Error> for SqliteError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Sqlite(tokio_rusqlite::Error::Rusqlite(err))
    }
}

impl From<SqliteError> for OrmError {
    fn from(err: SqliteError) -> Self {
        match err {
            SqliteError::Config(message) => OrmError::config("sqlite", message),
            err => OrmError::database("sqlite", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SqliteError::config("database path is required");
        assert_eq!(
            err.to_string(),
            "Configuration error: database path is required"
        );
    }

    #[test]
    fn test_error_conversion() {
        let err: OrmError = SqliteError::pool("closed").into();
        assert!(err.is_database());
        assert_eq!(err.to_string(), "sqlite error: Pool error: closed");

        let err: OrmError = SqliteError::config("database path is required").into();
        assert!(err.is_config());
        assert!(!err.is_database());
    }
}
