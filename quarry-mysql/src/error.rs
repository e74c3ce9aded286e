//! Error types for MySQL operations.

use quarry_query::OrmError;
use thiserror::Error;

/// Result type for MySQL operations.
pub type MysqlResult<T> = Result<T, MysqlError>;

/// Error type for MySQL operations.
#[derive(Error, Debug)]
pub enum MysqlError {
    /// MySQL driver error.
    #[error("MySQL error: {0}")]
    Mysql(#[from] mysql_async::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A column value has no ORM equivalent.
    #[error("Type conversion error: {0}")]
    TypeConversion(String),
}

impl MysqlError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a type conversion error.
    pub fn type_conversion(msg: impl Into<String>) -> Self {
        Self::TypeConversion(msg.into())
    }

    /// Check if this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<MysqlError> for OrmError {
    fn from(err: MysqlError) -> Self {
        match err {
            MysqlError::Config(message) => OrmError::config("mysql", message),
            err => OrmError::database("mysql", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MysqlError::config("user is required");
        assert_eq!(err.to_string(), "Configuration error: user is required");
        assert!(err.is_config());
    }

    #[test]
    fn test_error_conversion() {
        let err: OrmError = MysqlError::type_conversion("binary column").into();
        assert!(err.is_database());
        assert_eq!(
            err.to_string(),
            "mysql error: Type conversion error: binary column"
        );

        let err: OrmError = MysqlError::config("user is required").into();
        assert!(err.is_config());
        assert_eq!(err.to_string(), "mysql configuration error: user is required");
    }
}
