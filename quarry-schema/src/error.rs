//! Error types for model definitions and value conversion.

use miette::Diagnostic;
use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while building a model schema.
///
/// All of them are definition-time errors: a schema is built exactly once per
/// model type, so they surface once rather than on every instance.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SchemaError {
    /// A second field was marked as primary key.
    #[error("duplicate primary key for field `{field}` in model `{model}`")]
    #[diagnostic(
        code(quarry::schema::duplicate_primary_key),
        help("mark exactly one field with `.primary_key()`")
    )]
    DuplicatePrimaryKey { model: String, field: String },

    /// No field was marked as primary key.
    #[error("primary key not found in model `{model}`")]
    #[diagnostic(
        code(quarry::schema::missing_primary_key),
        help("mark exactly one field with `.primary_key()`")
    )]
    MissingPrimaryKey { model: String },

    /// Two fields share an attribute or column name.
    #[error("duplicate field `{field}` in model `{model}`")]
    #[diagnostic(code(quarry::schema::duplicate_field))]
    DuplicateField { model: String, field: String },

    /// The field kind cannot serve as a primary key.
    #[error("field `{model}.{field}` of type `{column_type}` cannot be a primary key")]
    #[diagnostic(
        code(quarry::schema::invalid_primary_key),
        help("boolean and text columns cannot be primary keys")
    )]
    InvalidPrimaryKey {
        model: String,
        field: String,
        column_type: String,
    },
}

impl SchemaError {
    /// Name of the model the error was raised for.
    pub fn model(&self) -> &str {
        match self {
            Self::DuplicatePrimaryKey { model, .. }
            | Self::MissingPrimaryKey { model }
            | Self::DuplicateField { model, .. }
            | Self::InvalidPrimaryKey { model, .. } => model,
        }
    }
}

/// A value could not be converted to the requested type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot convert {found} value `{value}` to {expected}")]
pub struct ConversionError {
    /// The type that was requested.
    pub expected: &'static str,
    /// The type of the value that was found.
    pub found: &'static str,
    /// Rendered form of the offending value.
    pub value: String,
}

impl ConversionError {
    /// Create a new conversion error.
    pub fn new(expected: &'static str, found: &'static str, value: impl Into<String>) -> Self {
        Self {
            expected,
            found,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchemaError::DuplicatePrimaryKey {
            model: "User".into(),
            field: "email".into(),
        };
        assert_eq!(
            err.to_string(),
            "duplicate primary key for field `email` in model `User`"
        );
        assert_eq!(err.model(), "User");
    }

    #[test]
    fn test_diagnostic_code() {
        let err = SchemaError::MissingPrimaryKey {
            model: "Blog".into(),
        };
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("quarry::schema::missing_primary_key"));
    }

    #[test]
    fn test_conversion_error_display() {
        let err = ConversionError::new("integer", "text", "abc");
        assert_eq!(err.to_string(), "cannot convert text value `abc` to integer");
    }
}
