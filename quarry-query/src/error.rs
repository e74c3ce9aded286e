//! Error types for query execution and record access.

use quarry_schema::{ConversionError, SchemaError};
use thiserror::Error;

/// Result type for ORM operations.
pub type OrmResult<T> = Result<T, OrmError>;

/// Boxed driver error kept as the source of [`OrmError::Database`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by records, models and the query executor.
#[derive(Error, Debug)]
pub enum OrmError {
    /// The model definition is invalid.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A query was issued before the connection pool was created.
    #[error("connection pool has not been created")]
    PoolNotInitialized,

    /// The connection pool was created twice.
    #[error("connection pool has already been created")]
    PoolAlreadyInitialized,

    /// The database driver reported an error.
    #[error("{backend} error: {message}")]
    Database {
        /// Backend name, e.g. `mysql`.
        backend: &'static str,
        /// Driver message.
        message: String,
        /// Underlying driver error.
        #[source]
        source: Option<BoxError>,
    },

    /// The backend configuration is invalid or incomplete.
    #[error("{backend} configuration error: {message}")]
    Config {
        /// Backend name, e.g. `mysql`.
        backend: &'static str,
        /// What is wrong with the configuration.
        message: String,
    },

    /// An argument had an unsupported shape or value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An attribute was read that holds no value.
    #[error("'{model}' object has no attribute '{attribute}'")]
    NoSuchAttribute { model: String, attribute: String },

    /// The model declares no such field.
    #[error("model `{model}` has no field `{field}`")]
    UnknownField { model: String, field: String },

    /// A stored value could not be converted to the field's type.
    #[error("field `{field}`: {source}")]
    TypeConversion {
        field: String,
        #[source]
        source: ConversionError,
    },
}

impl OrmError {
    /// Create a database error carrying the driver error as its source.
    pub fn database<E>(backend: &'static str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Database {
            backend,
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Create a database error from a message only.
    pub fn database_message(backend: &'static str, message: impl Into<String>) -> Self {
        Self::Database {
            backend,
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error.
    pub fn config(backend: &'static str, message: impl Into<String>) -> Self {
        Self::Config {
            backend,
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Check if this is a missing-pool error.
    pub fn is_pool_not_initialized(&self) -> bool {
        matches!(self, Self::PoolNotInitialized)
    }

    /// Check if this error came from the database driver.
    pub fn is_database(&self) -> bool {
        matches!(self, Self::Database { .. })
    }

    /// Check if this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Check if this is an invalid argument error.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
