//! Clauses accepted by `find_all`.

use quarry_schema::Value;

use crate::error::{OrmError, OrmResult};

/// A `limit` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// `limit ?` with the maximum number of rows.
    Count(u64),
    /// `limit ?, ?` with the number of rows to skip and the maximum to return.
    Range { offset: u64, count: u64 },
}

impl Limit {
    /// `limit count`
    pub fn count(count: u64) -> Self {
        Self::Count(count)
    }

    /// `limit offset, count`
    pub fn range(offset: u64, count: u64) -> Self {
        Self::Range { offset, count }
    }

    /// SQL fragment following `limit`.
    pub(crate) fn clause(&self) -> &'static str {
        match self {
            Self::Count(_) => "?",
            Self::Range { .. } => "?, ?",
        }
    }

    /// Arguments bound to [`Limit::clause`], in order.
    pub(crate) fn args(&self) -> OrmResult<Vec<Value>> {
        match *self {
            Self::Count(count) => Ok(vec![bound(count)?]),
            Self::Range { offset, count } => Ok(vec![bound(offset)?, bound(count)?]),
        }
    }
}

fn bound(n: u64) -> OrmResult<Value> {
    i64::try_from(n)
        .map(Value::Int)
        .map_err(|_| OrmError::invalid_argument(format!("limit value {} is out of range", n)))
}

fn non_negative(value: &Value) -> OrmResult<u64> {
    match value {
        Value::Int(n) if *n >= 0 => Ok(*n as u64),
        other => Err(OrmError::invalid_argument(format!(
            "invalid limit value: {}",
            other
        ))),
    }
}

impl From<u64> for Limit {
    fn from(count: u64) -> Self {
        Self::Count(count)
    }
}

impl From<(u64, u64)> for Limit {
    fn from((offset, count): (u64, u64)) -> Self {
        Self::Range { offset, count }
    }
}

/// A single integer is a row count.
impl TryFrom<Value> for Limit {
    type Error = OrmError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        non_negative(&value).map(Self::Count)
    }
}

/// One integer is a row count, two integers are `(offset, count)`. Any
/// other shape is rejected.
impl TryFrom<Vec<Value>> for Limit {
    type Error = OrmError;

    fn try_from(values: Vec<Value>) -> Result<Self, Self::Error> {
        match values.as_slice() {
            [count] => Ok(Self::Count(non_negative(count)?)),
            [offset, count] => Ok(Self::Range {
                offset: non_negative(offset)?,
                count: non_negative(count)?,
            }),
            _ => Err(OrmError::invalid_argument(format!(
                "invalid limit value: expected 1 or 2 integers, got {}",
                values.len()
            ))),
        }
    }
}

/// Optional `where`, `order by` and `limit` clauses for a select.
///
/// `where` and `order by` are raw SQL fragments; values they reference go in
/// `args` as `?` placeholders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    /// Condition after `where`.
    pub where_clause: Option<String>,
    /// Values for the placeholders in `where_clause`.
    pub args: Vec<Value>,
    /// Expression after `order by`.
    pub order_by: Option<String>,
    /// Row limit.
    pub limit: Option<Limit>,
}

impl FindOptions {
    /// No clauses: every row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `where` condition.
    pub fn filter(mut self, condition: impl Into<String>) -> Self {
        self.where_clause = Some(condition.into());
        self
    }

    /// Bind one placeholder value.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Bind several placeholder values.
    pub fn args<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.args.extend(values.into_iter().map(Into::into));
        self
    }

    /// Set the `order by` expression.
    pub fn order_by(mut self, order: impl Into<String>) -> Self {
        self.order_by = Some(order.into());
        self
    }

    /// Set the row limit.
    pub fn limit(mut self, limit: impl Into<Limit>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    /// Set the row limit from untyped values, as received from a request.
    pub fn try_limit(mut self, values: Vec<Value>) -> OrmResult<Self> {
        self.limit = Some(Limit::try_from(values)?);
        Ok(self)
    }

    /// Render the statement and its arguments on top of a select template.
    pub(crate) fn render(&self, select_sql: &str) -> OrmResult<(String, Vec<Value>)> {
        let mut sql = vec![select_sql];
        let mut args = self.args.clone();

        if let Some(condition) = self.where_clause.as_deref().filter(|c| !c.is_empty()) {
            sql.push("where");
            sql.push(condition);
        }
        if let Some(order) = self.order_by.as_deref().filter(|o| !o.is_empty()) {
            sql.push("order by");
            sql.push(order);
        }
        if let Some(limit) = &self.limit {
            sql.push("limit");
            sql.push(limit.clause());
            args.extend(limit.args()?);
        }

        Ok((sql.join(" "), args))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SELECT: &str = "select `id`, `name` from `users`";

    #[test]
    fn test_render_without_clauses() {
        let (sql, args) = FindOptions::new().render(SELECT).unwrap();
        assert_eq!(sql, SELECT);
        assert!(args.is_empty());
    }

    #[test]
    fn test_render_all_clauses() {
        let options = FindOptions::new()
            .filter("`name`=?")
            .arg("alice")
            .order_by("`id` desc")
            .limit((10u64, 5u64));
        let (sql, args) = options.render(SELECT).unwrap();
        assert_eq!(
            sql,
            "select `id`, `name` from `users` where `name`=? order by `id` desc limit ?, ?"
        );
        assert_eq!(args, vec![Value::from("alice"), Value::Int(10), Value::Int(5)]);
    }

    #[test]
    fn test_render_count_limit() {
        let (sql, args) = FindOptions::new().limit(5u64).render(SELECT).unwrap();
        assert_eq!(sql, "select `id`, `name` from `users` limit ?");
        assert_eq!(args, vec![Value::Int(5)]);
    }

    #[test]
    fn test_limit_shapes() {
        assert_eq!(Limit::try_from(Value::Int(5)).unwrap(), Limit::Count(5));
        assert_eq!(
            Limit::try_from(vec![Value::Int(10), Value::Int(5)]).unwrap(),
            Limit::range(10, 5)
        );
        assert_eq!(Limit::try_from(vec![Value::Int(3)]).unwrap(), Limit::count(3));
    }

    #[test]
    fn test_invalid_limit_shapes() {
        assert!(Limit::try_from(Value::from("bad")).unwrap_err().is_invalid_argument());
        assert!(Limit::try_from(Value::Int(-1)).unwrap_err().is_invalid_argument());
        assert!(Limit::try_from(Vec::<Value>::new()).unwrap_err().is_invalid_argument());
        assert!(
            Limit::try_from(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
                .unwrap_err()
                .is_invalid_argument()
        );
        assert!(
            FindOptions::new()
                .try_limit(vec![Value::Float(1.5)])
                .unwrap_err()
                .is_invalid_argument()
        );
    }

    #[test]
    fn test_limit_out_of_range() {
        let err = FindOptions::new().limit(u64::MAX).render(SELECT).unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
