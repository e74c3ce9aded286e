//! Conversion between ORM values and SQLite values.

use rusqlite::types::Value as SqliteValue;
use quarry_schema::Value;

use crate::error::{SqliteError, SqliteResult};

/// Convert an ORM value to a SQLite parameter.
///
/// SQLite has no boolean type; booleans bind as `0` / `1`.
pub fn to_sqlite(value: &Value) -> SqliteValue {
    match value {
        Value::Null => SqliteValue::Null,
        Value::Bool(b) => SqliteValue::Integer(i64::from(*b)),
        Value::Int(i) => SqliteValue::Integer(*i),
        Value::Float(f) => SqliteValue::Real(*f),
        Value::Text(s) => SqliteValue::Text(s.clone()),
    }
}

/// Convert a SQLite column value to an ORM value.
pub fn from_sqlite(value: SqliteValue) -> SqliteResult<Value> {
    Ok(match value {
        SqliteValue::Null => Value::Null,
        SqliteValue::Integer(i) => Value::Int(i),
        SqliteValue::Real(f) => Value::Float(f),
        SqliteValue::Text(s) => Value::Text(s),
        SqliteValue::Blob(bytes) => Value::Text(
            String::from_utf8(bytes)
                .map_err(|_| SqliteError::type_conversion("blob column is not valid UTF-8"))?,
        ),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_to_sqlite() {
        assert_eq!(to_sqlite(&Value::Null), SqliteValue::Null);
        assert_eq!(to_sqlite(&Value::Bool(true)), SqliteValue::Integer(1));
        assert_eq!(to_sqlite(&Value::Int(-4)), SqliteValue::Integer(-4));
        assert_eq!(to_sqlite(&Value::Float(0.5)), SqliteValue::Real(0.5));
        assert_eq!(to_sqlite(&Value::from("a")), SqliteValue::Text("a".into()));
    }

    #[test]
    fn test_from_sqlite() {
        assert_eq!(from_sqlite(SqliteValue::Null).unwrap(), Value::Null);
        assert_eq!(from_sqlite(SqliteValue::Integer(3)).unwrap(), Value::Int(3));
        assert_eq!(from_sqlite(SqliteValue::Real(1.5)).unwrap(), Value::Float(1.5));
        assert_eq!(from_sqlite(SqliteValue::Blob(b"hi".to_vec())).unwrap(), Value::from("hi"));
        assert!(from_sqlite(SqliteValue::Blob(vec![0xff])).is_err());
    }
}
