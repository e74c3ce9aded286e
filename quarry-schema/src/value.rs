//! Runtime values exchanged between models and database drivers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConversionError;

/// A single column value.
///
/// `Null` is SQL `NULL`. A field that was never set is represented by the
/// absence of a value (`Option::None`), not by `Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
}

impl Value {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the value's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }

    fn mismatch(&self, expected: &'static str) -> ConversionError {
        ConversionError::new(expected, self.type_name(), self.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = ConversionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(i) => Ok(i),
            Value::Bool(b) => Ok(i64::from(b)),
            Value::Text(ref s) => s.trim().parse().map_err(|_| value.mismatch("integer")),
            other => Err(other.mismatch("integer")),
        }
    }
}

impl TryFrom<Value> for i32 {
    type Error = ConversionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let rendered = value.to_string();
        let found = value.type_name();
        let wide = i64::try_from(value)?;
        i32::try_from(wide).map_err(|_| ConversionError::new("32-bit integer", found, rendered))
    }
}

impl TryFrom<Value> for f64 {
    type Error = ConversionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            Value::Text(ref s) => s.trim().parse().map_err(|_| value.mismatch("float")),
            other => Err(other.mismatch("float")),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = ConversionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(b),
            Value::Int(0) => Ok(false),
            Value::Int(1) => Ok(true),
            Value::Text(ref s) => match s.trim() {
                "0" | "false" | "FALSE" => Ok(false),
                "1" | "true" | "TRUE" => Ok(true),
                _ => Err(value.mismatch("boolean")),
            },
            other => Err(other.mismatch("boolean")),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = ConversionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Text(s) => Ok(s),
            Value::Null => Err(value.mismatch("text")),
            other => Ok(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(42), Value::Int(42));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("a"), Value::Text("a".into()));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(1.5)), Value::Float(1.5));
    }

    #[test]
    fn test_try_from_integer() {
        assert_eq!(i64::try_from(Value::Int(7)), Ok(7));
        assert_eq!(i64::try_from(Value::Text(" 12 ".into())), Ok(12));
        assert!(i64::try_from(Value::Text("x".into())).is_err());
        assert!(i64::try_from(Value::Null).is_err());
    }

    #[test]
    fn test_try_from_i32_out_of_range() {
        let err = i32::try_from(Value::Int(i64::MAX)).unwrap_err();
        assert_eq!(err.expected, "32-bit integer");
    }

    #[test]
    fn test_try_from_bool_accepts_tinyint() {
        assert_eq!(bool::try_from(Value::Int(1)), Ok(true));
        assert_eq!(bool::try_from(Value::Int(0)), Ok(false));
        assert!(bool::try_from(Value::Int(2)).is_err());
    }

    #[test]
    fn test_try_from_string_renders_scalars() {
        assert_eq!(String::try_from(Value::Int(3)), Ok("3".to_string()));
        assert!(String::try_from(Value::Null).is_err());
    }

    #[test]
    fn test_serialize_untagged() {
        let json = serde_json::to_string(&vec![
            Value::Null,
            Value::Bool(false),
            Value::Int(1),
            Value::Text("x".into()),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,false,1,"x"]"#);
    }
}
