//! Conversion between ORM values and MySQL values.

use mysql_async::{Params, Value as MysqlValue};
use quarry_schema::Value;

use crate::error::{MysqlError, MysqlResult};

/// Convert an ORM value to a MySQL parameter.
pub fn to_mysql(value: &Value) -> MysqlValue {
    match value {
        Value::Null => MysqlValue::NULL,
        Value::Bool(b) => MysqlValue::from(*b),
        Value::Int(i) => MysqlValue::from(*i),
        Value::Float(f) => MysqlValue::from(*f),
        Value::Text(s) => MysqlValue::from(s.as_str()),
    }
}

/// Build positional parameters for a statement.
pub fn to_params(args: &[Value]) -> Params {
    if args.is_empty() {
        Params::Empty
    } else {
        Params::Positional(args.iter().map(to_mysql).collect())
    }
}

/// Convert a MySQL column value to an ORM value.
///
/// Dates and times become text; binary data that is not UTF-8 is rejected.
pub fn from_mysql(value: MysqlValue) -> MysqlResult<Value> {
    Ok(match value {
        MysqlValue::NULL => Value::Null,
        MysqlValue::Bytes(bytes) => Value::Text(
            String::from_utf8(bytes)
                .map_err(|_| MysqlError::type_conversion("binary column is not valid UTF-8"))?,
        ),
        MysqlValue::Int(i) => Value::Int(i),
        MysqlValue::UInt(u) => Value::Int(i64::try_from(u).map_err(|_| {
            MysqlError::type_conversion(format!("unsigned value {} is out of range", u))
        })?),
        MysqlValue::Float(f) => Value::Float(f64::from(f)),
        MysqlValue::Double(d) => Value::Float(d),
        MysqlValue::Date(year, month, day, hour, minute, second, micro) => {
            let mut text = format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                year, month, day, hour, minute, second
            );
            if micro > 0 {
                text.push_str(&format!(".{:06}", micro));
            }
            Value::Text(text)
        }
        MysqlValue::Time(is_neg, days, hours, minutes, seconds, micro) => {
            let sign = if is_neg { "-" } else { "" };
            let mut text = format!(
                "{}{:02}:{:02}:{:02}",
                sign,
                days * 24 + u32::from(hours),
                minutes,
                seconds
            );
            if micro > 0 {
                text.push_str(&format!(".{:06}", micro));
            }
            Value::Text(text)
        }
    })
}
