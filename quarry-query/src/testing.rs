//! In-memory backend that records every statement it receives.

use async_trait::async_trait;
use parking_lot::Mutex;

use quarry_schema::Value;

use crate::error::{OrmError, OrmResult};
use crate::executor::{Backend, Row};
use crate::sql::Dialect;

/// A statement seen by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Call {
    pub sql: String,
    pub args: Vec<Value>,
    pub max_rows: Option<usize>,
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<Call>,
    rows: Vec<Row>,
    affected: u64,
    failure: Option<String>,
}

/// Serves canned rows and affected-row counts, using the SQLite dialect so
/// placeholder translation is observable.
#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    state: Mutex<State>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.set_affected(1);
        backend
    }

    pub fn push_row<'a>(&self, row: impl IntoIterator<Item = (&'a str, Value)>) {
        let row: Row = row.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        self.state.lock().rows.push(row);
    }

    pub fn clear_rows(&self) {
        self.state.lock().rows.clear();
    }

    pub fn set_affected(&self, affected: u64) {
        self.state.lock().affected = affected;
    }

    pub fn fail_with(&self, message: &str) {
        self.state.lock().failure = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn last_call(&self) -> Call {
        self.state
            .lock()
            .calls
            .last()
            .cloned()
            .expect("no statement recorded")
    }

    fn record(&self, sql: &str, args: &[Value], max_rows: Option<usize>) -> OrmResult<()> {
        let mut state = self.state.lock();
        state.calls.push(Call {
            sql: sql.to_string(),
            args: args.to_vec(),
            max_rows,
        });
        match state.failure.take() {
            Some(message) => Err(OrmError::database_message("sqlite", message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Backend for RecordingBackend {
    const DIALECT: Dialect = Dialect::Sqlite;

    async fn fetch(
        &self,
        sql: &str,
        args: &[Value],
        max_rows: Option<usize>,
    ) -> OrmResult<Vec<Row>> {
        self.record(sql, args, max_rows)?;
        let rows = self.state.lock().rows.clone();
        Ok(match max_rows {
            Some(n) => rows.into_iter().take(n).collect(),
            None => rows,
        })
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> OrmResult<u64> {
        self.record(sql, args, None)?;
        Ok(self.state.lock().affected)
    }
}
