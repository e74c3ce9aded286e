//! The query executor: parameterized `select` and `execute` over a backend.
//!
//! SQL handed to [`select`] and [`execute`] uses the portable `?` marker.
//! Values travel only through `args` and are bound by the driver, never
//! spliced into the statement text.

use async_trait::async_trait;
use indexmap::IndexMap;
use tracing::{debug, info};

use quarry_schema::Value;

use crate::error::OrmResult;
use crate::sql::{Dialect, translate_placeholders};

/// One result row: column name to value, in select-list order.
pub type Row = IndexMap<String, Value>;

/// A pooled database backend.
///
/// Implementations borrow one connection per call and give it back on every
/// exit path, error paths included. Statements arrive already translated to
/// the backend's native placeholder syntax.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Dialect used to translate portable placeholders.
    const DIALECT: Dialect;

    /// Run a query and return at most `max_rows` rows (all rows if `None`).
    async fn fetch(
        &self,
        sql: &str,
        args: &[Value],
        max_rows: Option<usize>,
    ) -> OrmResult<Vec<Row>>;

    /// Run a mutating statement and return the number of affected rows.
    async fn execute(&self, sql: &str, args: &[Value]) -> OrmResult<u64>;
}

/// Run a `select` statement.
///
/// With `size`, at most `size` rows are returned. A size of zero fetches
/// every row, like no size at all.
pub async fn select<B>(
    backend: &B,
    sql: &str,
    args: &[Value],
    size: Option<usize>,
) -> OrmResult<Vec<Row>>
where
    B: Backend + ?Sized,
{
    let size = size.filter(|&n| n > 0);
    let native = translate_placeholders(sql, B::DIALECT);
    info!(target: "quarry::sql", backend = B::DIALECT.name(), sql = %native, "SQL");
    debug!(target: "quarry::sql", args = ?args, "bound arguments");

    let mut rows = backend.fetch(&native, args, size).await?;
    if let Some(size) = size {
        rows.truncate(size);
    }

    info!(target: "quarry::sql", rows = rows.len(), "rows returned");
    Ok(rows)
}

/// Run an `insert`, `update` or `delete` statement and return the number of
/// affected rows. Driver errors propagate unchanged.
pub async fn execute<B>(backend: &B, sql: &str, args: &[Value]) -> OrmResult<u64>
where
    B: Backend + ?Sized,
{
    let native = translate_placeholders(sql, B::DIALECT);
    info!(target: "quarry::sql", backend = B::DIALECT.name(), sql = %native, "SQL");
    debug!(target: "quarry::sql", args = ?args, "bound arguments");

    let affected = backend.execute(&native, args).await?;
    debug!(target: "quarry::sql", affected, "statement executed");
    Ok(affected)
}
