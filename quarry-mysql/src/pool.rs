//! Connection pool for MySQL.

use std::sync::Arc;

use async_trait::async_trait;
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Pool, Value as MysqlValue};
use tracing::{debug, info};

use quarry_query::{Backend, Dialect, OrmResult, PoolManager, Row, Value};

use crate::config::MysqlConfig;
use crate::error::MysqlResult;
use crate::types::{from_mysql, to_params};

/// A `mysql_async` connection pool.
///
/// Each statement borrows one connection; the connection goes back to the
/// pool when it is dropped, whether the statement succeeded or not.
#[derive(Clone)]
pub struct MysqlPool {
    inner: Pool,
    config: Arc<MysqlConfig>,
}

impl MysqlPool {
    /// Create a new connection pool from configuration.
    ///
    /// Connections are opened lazily.
    pub async fn new(config: MysqlConfig) -> MysqlResult<Self> {
        let opts = config.to_opts()?;
        let pool = Pool::new(opts);

        info!(
            host = %config.host,
            port = %config.port,
            database = config.database.as_deref().unwrap_or_default(),
            min_size = config.min_size,
            max_size = config.max_size,
            "create database connection pool"
        );

        Ok(Self {
            inner: pool,
            config: Arc::new(config),
        })
    }

    /// Get the pool configuration.
    pub fn config(&self) -> &MysqlConfig {
        &self.config
    }

    async fn conn(&self) -> MysqlResult<Conn> {
        debug!("Acquiring connection from pool");
        Ok(self.inner.get_conn().await?)
    }

    /// Check if the pool is healthy by running `SELECT 1`.
    pub async fn is_healthy(&self) -> bool {
        match self.inner.get_conn().await {
            Ok(mut conn) => conn.query_drop("SELECT 1").await.is_ok(),
            Err(_) => false,
        }
    }

    /// Disconnect all connections and close the pool.
    pub async fn disconnect(&self) -> MysqlResult<()> {
        self.inner.clone().disconnect().await?;
        info!("MySQL connection pool closed");
        Ok(())
    }

    async fn fetch_rows(
        &self,
        sql: &str,
        args: &[Value],
        max_rows: Option<usize>,
    ) -> MysqlResult<Vec<Row>> {
        let mut conn = self.conn().await?;
        let mut rows: Vec<mysql_async::Row> = conn.exec(sql, to_params(args)).await?;
        if let Some(max_rows) = max_rows {
            rows.truncate(max_rows);
        }
        rows.iter().map(row_to_map).collect()
    }

    async fn execute_statement(&self, sql: &str, args: &[Value]) -> MysqlResult<u64> {
        let mut conn = self.conn().await?;
        conn.exec_drop(sql, to_params(args)).await?;
        Ok(conn.affected_rows())
    }
}

impl std::fmt::Debug for MysqlPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MysqlPool")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("database", &self.config.database)
            .finish()
    }
}

fn row_to_map(row: &mysql_async::Row) -> MysqlResult<Row> {
    row.columns_ref()
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let value: Option<MysqlValue> = row.get(i);
            Ok((
                column.name_str().into_owned(),
                from_mysql(value.unwrap_or(MysqlValue::NULL))?,
            ))
        })
        .collect()
}

#[async_trait]
impl Backend for MysqlPool {
    const DIALECT: Dialect = Dialect::MySql;

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

/// Create the MySQL pool and install it into `manager`.
///
/// Missing credentials or database name fail before any connection is
/// attempted. Creating the pool twice fails with
/// [`OrmError::PoolAlreadyInitialized`](quarry_query::OrmError::PoolAlreadyInitialized).
pub async fn create_pool(
    manager: &PoolManager<MysqlPool>,
    config: MysqlConfig,
) -> OrmResult<&MysqlPool> {
    if manager.is_initialized() {
        return Err(quarry_query::OrmError::PoolAlreadyInitialized);
    }
    let pool = MysqlPool::new(config).await?;
    manager.install(pool)
}
