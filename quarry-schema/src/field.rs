//! Field descriptors: column metadata for one model attribute.

use std::fmt;
use std::sync::Arc;

use crate::error::ConversionError;
use crate::value::Value;

/// Logical type of a field, used to coerce driver values back into the
/// field's type (drivers report booleans as integers, for instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Bounded string (`varchar`).
    String,
    /// 64-bit integer (`bigint`).
    Integer,
    /// Boolean (`boolean`).
    Boolean,
    /// Floating point (`real`).
    Float,
    /// Unbounded text (`text`).
    Text,
}

impl FieldKind {
    /// Descriptor name used in `Display` output.
    pub fn descriptor_name(&self) -> &'static str {
        match self {
            Self::String => "StringField",
            Self::Integer => "IntegerField",
            Self::Boolean => "BooleanField",
            Self::Float => "FloatField",
            Self::Text => "TextField",
        }
    }

    /// Whether a field of this kind may be the primary key.
    pub fn can_be_primary_key(&self) -> bool {
        !matches!(self, Self::Boolean | Self::Text)
    }

    /// Coerce a value read from the database into this kind.
    ///
    /// `Null` passes through unchanged.
    pub fn coerce(&self, value: Value) -> Result<Value, ConversionError> {
        if value.is_null() {
            return Ok(value);
        }
        match self {
            Self::Integer => i64::try_from(value).map(Value::Int),
            Self::Boolean => bool::try_from(value).map(Value::Bool),
            Self::Float => f64::try_from(value).map(Value::Float),
            Self::String | Self::Text => String::try_from(value).map(Value::Text),
        }
    }
}

/// Default for a field that has no value when a record is saved.
#[derive(Clone)]
pub enum FieldDefault {
    /// A fixed value.
    Value(Value),
    /// A zero-argument factory, invoked lazily each time a default is needed.
    Factory(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl FieldDefault {
    /// Produce the default value, invoking the factory if there is one.
    pub fn resolve(&self) -> Value {
        match self {
            Self::Value(v) => v.clone(),
            Self::Factory(f) => f(),
        }
    }

    /// Check if this default is a factory.
    pub fn is_factory(&self) -> bool {
        matches!(self, Self::Factory(_))
    }
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// Metadata describing one table column.
///
/// Descriptors are plain values: every builder method returns a new
/// descriptor and nothing mutates one after it is handed to a schema.
#[derive(Debug, Clone)]
pub struct Field {
    name: Option<String>,
    column_type: String,
    primary_key: bool,
    default: Option<FieldDefault>,
    kind: FieldKind,
}

impl Field {
    /// Create a descriptor of the given kind and column type, with no default.
    pub fn new(kind: FieldKind, column_type: impl Into<String>) -> Self {
        Self {
            name: None,
            column_type: column_type.into(),
            primary_key: false,
            default: None,
            kind,
        }
    }

    /// `varchar(100)` column without a default.
    pub fn string() -> Self {
        Self::new(FieldKind::String, "varchar(100)")
    }

    /// `bigint` column defaulting to `0`.
    pub fn integer() -> Self {
        Self::new(FieldKind::Integer, "bigint").default(0i64)
    }

    /// `boolean` column defaulting to `false`.
    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean, "boolean").default(false)
    }

    /// `real` column defaulting to `0.0`.
    pub fn float() -> Self {
        Self::new(FieldKind::Float, "real").default(0.0f64)
    }

    /// `text` column without a default.
    pub fn text() -> Self {
        Self::new(FieldKind::Text, "text")
    }

    /// Override the column name (defaults to the attribute name).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Override the column DDL, e.g. `varchar(50)`.
    pub fn ddl(mut self, column_type: impl Into<String>) -> Self {
        self.column_type = column_type.into();
        self
    }

    /// Mark the field as the model's primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Use a fixed default value.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(FieldDefault::Value(value.into()));
        self
    }

    /// Use a factory that is invoked whenever a default is needed.
    pub fn default_with<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(FieldDefault::Factory(Arc::new(factory)));
        self
    }

    /// Remove any default.
    pub fn no_default(mut self) -> Self {
        self.default = None;
        self
    }

    /// The column name override, if any.
    pub fn column_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The SQL column type.
    pub fn column_type(&self) -> &str {
        &self.column_type
    }

    /// Check if this is the primary key field.
    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// The field default, if any.
    pub fn default_value(&self) -> Option<&FieldDefault> {
        self.default.as_ref()
    }

    /// The logical kind of the field.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{}, {}:{}>",
            self.kind.descriptor_name(),
            self.column_type,
            self.name.as_deref().unwrap_or("")
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_presets() {
        let string = Field::string();
        assert_eq!(string.column_type(), "varchar(100)");
        assert!(string.default_value().is_none());

        let integer = Field::integer();
        assert_eq!(integer.column_type(), "bigint");
        assert_eq!(integer.default_value().map(FieldDefault::resolve), Some(Value::Int(0)));

        let boolean = Field::boolean();
        assert_eq!(boolean.column_type(), "boolean");
        assert_eq!(boolean.default_value().map(FieldDefault::resolve), Some(Value::Bool(false)));

        let float = Field::float();
        assert_eq!(float.column_type(), "real");
        assert_eq!(float.default_value().map(FieldDefault::resolve), Some(Value::Float(0.0)));

        assert_eq!(Field::text().column_type(), "text");
    }

    #[test]
    fn test_builder_methods() {
        let field = Field::string().name("user_name").ddl("varchar(50)").primary_key();
        assert_eq!(field.column_name(), Some("user_name"));
        assert_eq!(field.column_type(), "varchar(50)");
        assert!(field.is_primary_key());
        assert!(Field::integer().no_default().default_value().is_none());
    }

    #[test]
    fn test_factory_default_is_lazy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let field = Field::string().default_with(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Value::from("generated")
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let default = field.default_value().unwrap();
        assert!(default.is_factory());
        assert_eq!(default.resolve(), Value::from("generated"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(Field::string().name("email").to_string(), "<StringField, varchar(100):email>");
        assert_eq!(Field::integer().to_string(), "<IntegerField, bigint:>");
    }

    #[test]
    fn test_coerce() {
        assert_eq!(FieldKind::Boolean.coerce(Value::Int(1)), Ok(Value::Bool(true)));
        assert_eq!(FieldKind::Float.coerce(Value::Int(2)), Ok(Value::Float(2.0)));
        assert_eq!(FieldKind::Integer.coerce(Value::Null), Ok(Value::Null));
        assert_eq!(FieldKind::Text.coerce(Value::Int(5)), Ok(Value::from("5")));
        assert!(FieldKind::Integer.coerce(Value::from("nope")).is_err());
    }

    #[test]
    fn test_primary_key_capability() {
        assert!(FieldKind::Integer.can_be_primary_key());
        assert!(FieldKind::String.can_be_primary_key());
        assert!(!FieldKind::Boolean.can_be_primary_key());
        assert!(!FieldKind::Text.can_be_primary_key());
    }
}
