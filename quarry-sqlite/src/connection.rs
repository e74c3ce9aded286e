//! Borrowed SQLite connections.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OwnedSemaphorePermit;
use tokio_rusqlite::Connection;
use tracing::trace;

/// Idle connections waiting to be borrowed.
pub(crate) type IdleQueue = Arc<Mutex<VecDeque<Connection>>>;

/// A connection borrowed from the pool.
///
/// Dropping it puts the connection back on the idle queue and releases the
/// pool permit, on success and error paths alike.
pub(crate) struct PooledConnection {
    conn: Connection,
    idle: IdleQueue,
    _permit: OwnedSemaphorePermit,
}

impl PooledConnection {
    pub(crate) fn new(conn: Connection, idle: IdleQueue, permit: OwnedSemaphorePermit) -> Self {
        Self {
            conn,
            idle,
            _permit: permit,
        }
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        trace!("Returning connection to pool");
        self.idle.lock().push_back(self.conn.clone());
    }
}
