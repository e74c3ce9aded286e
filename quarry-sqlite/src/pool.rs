//! Connection pool for SQLite.
//!
//! SQLite differs from a server database in one way that matters here: every
//! in-memory connection is its own isolated database. An in-memory pool
//! therefore holds exactly one connection and hands it out to one caller at
//! a time. File-based pools reuse up to `max_size` connections.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::params_from_iter;
use tokio::sync::Semaphore;
use tokio_rusqlite::Connection;
use tracing::{debug, info};

use quarry_query::{Backend, Dialect, OrmError, OrmResult, PoolManager, Row, Value};

use crate::config::{DatabasePath, SqliteConfig};
use crate::connection::{IdleQueue, PooledConnection};
use crate::error::{SqliteError, SqliteResult};
use crate::types::{from_sqlite, to_sqlite};

/// A connection pool for SQLite.
///
/// ```rust,ignore
/// use quarry_sqlite::{SqliteConfig, SqlitePool};
///
/// let pool = SqlitePool::new(SqliteConfig::file("data.db")).await?;
/// ```
#[derive(Clone)]
pub struct SqlitePool {
    config: Arc<SqliteConfig>,
    /// Limits the connections in use at once.
    semaphore: Arc<Semaphore>,
    idle: IdleQueue,
}

impl SqlitePool {
    /// Create a new connection pool from configuration.
    ///
    /// At least one connection is opened up front so a bad path fails here
    /// rather than on the first query.
    pub async fn new(config: SqliteConfig) -> SqliteResult<Self> {
        config.validate()?;
        let max_size = config.effective_max_size();
        let warm = if config.path.is_memory() {
            1
        } else {
            config.min_size.max(1)
        };

        let mut idle = VecDeque::with_capacity(max_size);
        for _ in 0..warm {
            idle.push_back(Self::open_connection(&config).await?);
        }

        info!(
            path = %config.path_str(),
            min_size = warm,
            max_size,
            "create database connection pool"
        );

        Ok(Self {
            config: Arc::new(config),
            semaphore: Arc::new(Semaphore::new(max_size)),
            idle: Arc::new(Mutex::new(idle)),
        })
    }

    /// Open a new connection with the given configuration.
    async fn open_connection(config: &SqliteConfig) -> SqliteResult<Connection> {
        let init_sql = config.init_sql();

        let conn = match &config.path {
            DatabasePath::Memory => Connection::open_in_memory().await?,
            DatabasePath::File(path) => Connection::open(path).await?,
        };

        conn.call(move |conn| {
            conn.execute_batch(&init_sql)?;
            Ok(())
        })
        .await?;

        Ok(conn)
    }

    /// Borrow a connection, waiting while all of them are in use.
    async fn get(&self) -> SqliteResult<PooledConnection> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| SqliteError::pool(format!("failed to acquire permit: {}", e)))?;

        let reused = self.idle.lock().pop_front();
        let conn = match reused {
            Some(conn) => conn,
            None => {
                debug!("No idle connections, opening new connection");
                Self::open_connection(&self.config).await?
            }
        };
        debug!("Acquired connection from pool");

        Ok(PooledConnection::new(conn, self.idle.clone(), permit))
    }

    /// Get the pool configuration.
    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }

    /// Number of idle connections.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    /// Number of connections that could be borrowed right now.
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Run a batch of SQL statements without parameters, e.g. DDL.
    pub async fn execute_batch(&self, sql: &str) -> SqliteResult<()> {
        let sql = sql.to_string();
        let conn = self.get().await?;
        conn.conn()
            .call(move |conn| {
                conn.execute_batch(&sql)?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    /// Check if the pool is healthy by running `SELECT 1`.
    pub async fn is_healthy(&self) -> bool {
        self.execute_batch("SELECT 1").await.is_ok()
    }

    async fn fetch_rows(
        &self,
        sql: &str,
        args: &[Value],
        max_rows: Option<usize>,
    ) -> SqliteResult<Vec<Row>> {
        let sql = sql.to_string();
        let params: Vec<_> = args.iter().map(to_sqlite).collect();
        let conn = self.get().await?;

        let (columns, raw_rows) = conn
            .conn()
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let columns: Vec<String> = stmt
                    .column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect();

                let mut rows = stmt.query(params_from_iter(params.iter()))?;
                let mut raw_rows = Vec::new();
                while let Some(row) = rows.next()? {
                    if max_rows.is_some_and(|max| raw_rows.len() >= max) {
                        break;
                    }
                    let values = (0..columns.len())
                        .map(|i| row.get::<_, rusqlite::types::Value>(i))
                        .collect::<Result<Vec<_>, _>>()?;
                    raw_rows.push(values);
                }
                Ok((columns, raw_rows))
            })
            .await?;

        raw_rows
            .into_iter()
            .map(|values| {
                columns
                    .iter()
                    .cloned()
                    .zip(values)
                    .map(|(column, value)| Ok((column, from_sqlite(value)?)))
                    .collect()
            })
            .collect()
    }

    async fn execute_statement(&self, sql: &str, args: &[Value]) -> SqliteResult<u64> {
        let sql = sql.to_string();
        let params: Vec<_> = args.iter().map(to_sqlite).collect();
        let conn = self.get().await?;

        let affected = conn
            .conn()
            .call(move |conn| Ok(conn.execute(&sql, params_from_iter(params.iter()))?))
            .await?;
        Ok(affected as u64)
    }
}

impl std::fmt::Debug for SqlitePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlitePool")
            .field("path", &self.config.path_str())
            .field("idle", &self.idle_count())
            .finish()
    }
}

#[async_trait]
impl Backend for SqlitePool {
    const DIALECT: Dialect = Dialect::Sqlite;

    async fn fetch(
        &self,
        sql: &str,
        args: &[Value],
        max_rows: Option<usize>,
    ) -> OrmResult<Vec<Row>> {
        Ok(self.fetch_rows(sql, args, max_rows).await?)
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> OrmResult<u64> {
        Ok(self.execute_statement(sql, args).await?)
    }
}

/// Create the SQLite pool and install it into `manager`.
pub async fn create_pool(
    manager: &PoolManager<SqlitePool>,
    config: SqliteConfig,
) -> OrmResult<&SqlitePool> {
    if manager.is_initialized() {
        return Err(OrmError::PoolAlreadyInitialized);
    }
    let pool = SqlitePool::new(config).await?;
    manager.install(pool)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quarry_query::{execute, select};

    use super::*;

    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePool::new(SqliteConfig::memory()).await.unwrap();
        pool.execute_batch("create table `t` (`id` bigint not null, `name` text, primary key (`id`))")
            .await
            .unwrap();
        pool
    }

    #[tokio::test]
    async fn test_memory_pool_shares_one_connection() {
        let pool = memory_pool().await;
        assert_eq!(pool.available_permits(), 1);

        let affected = execute(&pool, "insert into `t` (`name`, `id`) values (?, ?)", &[
            Value::from("a"),
            Value::Int(1),
        ])
        .await
        .unwrap();
        assert_eq!(affected, 1);

        let rows = select(&pool, "select `id`, `name` from `t`", &[], None)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], Value::Int(1));
        assert_eq!(rows[0]["name"], Value::from("a"));
        assert_eq!(pool.idle_count(), 1);
    }

    #[tokio::test]
    async fn test_select_limits_rows() {
        let pool = memory_pool().await;
        for i in 0..5 {
            execute(&pool, "insert into `t` (`name`, `id`) values (?, ?)", &[
                Value::from(format!("n{}", i)),
                Value::Int(i),
            ])
            .await
            .unwrap();
        }

        let rows = select(&pool, "select `id` from `t` order by `id`", &[], Some(2))
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);

        let rows = select(&pool, "select `id` from `t` where `id`>=? order by `id`", &[Value::Int(3)], None)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], Value::Int(3));
    }

    #[tokio::test]
    async fn test_errors_release_the_connection() {
        let pool = memory_pool().await;
        let err = execute(&pool, "insert into `missing` (`id`) values (?)", &[Value::Int(1)])
            .await
            .unwrap_err();
        assert!(err.is_database());
        assert_eq!(pool.idle_count(), 1);
        assert_eq!(pool.available_permits(), 1);
        assert!(pool.is_healthy().await);
    }

    #[tokio::test]
    async fn test_file_pool_shares_data() {
        let dir = tempfile::tempdir().unwrap();
        let config = SqliteConfig::file(dir.path().join("quarry.db")).min_size(2);
        let pool = SqlitePool::new(config).await.unwrap();
        assert_eq!(pool.idle_count(), 2);

        pool.execute_batch("create table `t` (`id` bigint not null, primary key (`id`))")
            .await
            .unwrap();
        execute(&pool, "insert into `t` (`id`) values (?)", &[Value::Int(9)])
            .await
            .unwrap();

        let rows = select(&pool, "select count(`id`) as `_num_` from `t`", &[], None)
            .await
            .unwrap();
        assert_eq!(rows[0]["_num_"], Value::Int(1));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_pool_opens_non_utf8_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OsStr::from_bytes(b"data\xff.db"));
        let pool = SqlitePool::new(SqliteConfig::file(&path).min_size(2))
            .await
            .unwrap();
        assert_eq!(pool.idle_count(), 2);

        pool.execute_batch("create table `t` (`id` bigint not null, primary key (`id`))")
            .await
            .unwrap();
        // Hold one connection so the insert runs on the other.
        let held = pool.get().await.unwrap();
        execute(&pool, "insert into `t` (`id`) values (?)", &[Value::Int(1)])
            .await
            .unwrap();
        drop(held);

        assert!(path.exists());
        let rows = select(&pool, "select `id` from `t`", &[], None).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_create_pool_twice() {
        let manager = PoolManager::new();
        create_pool(&manager, SqliteConfig::memory()).await.unwrap();
        let err = create_pool(&manager, SqliteConfig::memory())
            .await
            .unwrap_err();
        assert!(matches!(err, OrmError::PoolAlreadyInitialized));
    }
}
