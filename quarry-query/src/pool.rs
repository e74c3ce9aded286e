//! The process-wide connection pool slot.
//!
//! A [`PoolManager`] is created empty at startup, filled once with a driver
//! pool, and then passed by reference to everything that issues queries.
//! Queries against an empty manager fail with
//! [`OrmError::PoolNotInitialized`].
//!
//! ```rust,ignore
//! use quarry_mysql::{MysqlConfig, MysqlPool, create_pool};
//! use quarry_query::PoolManager;
//!
//! static DB: PoolManager<MysqlPool> = PoolManager::new();
//!
//! create_pool(&DB, MysqlConfig::new("awesome").user("www").password("www")).await?;
//! let user = User::find(&DB, 1).await?;
//! ```

use std::fmt;
use std::sync::OnceLock;

use async_trait::async_trait;
use tracing::info;

use quarry_schema::Value;

use crate::error::{OrmError, OrmResult};
use crate::executor::{Backend, Row};
use crate::sql::Dialect;

/// Holds the shared pool once it has been created.
pub struct PoolManager<B> {
    slot: OnceLock<B>,
}

impl<B> PoolManager<B> {
    /// Create an empty manager.
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// Create a manager that already holds a pool.
    pub fn with_pool(pool: B) -> Self {
        let slot = OnceLock::new();
        let _ = slot.set(pool);
        Self { slot }
    }

    /// Install the pool. Fails if one is already installed.
    pub fn install(&self, pool: B) -> OrmResult<&B> {
        self.slot
            .set(pool)
            .map_err(|_| OrmError::PoolAlreadyInitialized)?;
        info!("database connection pool installed");
        self.get()
    }

    /// Get the pool, or [`OrmError::PoolNotInitialized`] if none exists yet.
    pub fn get(&self) -> OrmResult<&B> {
        self.slot.get().ok_or(OrmError::PoolNotInitialized)
    }

    /// Check whether a pool has been installed.
    pub fn is_initialized(&self) -> bool {
        self.slot.get().is_some()
    }
}

impl<B> Default for PoolManager<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> fmt::Debug for PoolManager<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolManager")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

#[async_trait]
impl<B: Backend> Backend for PoolManager<B> {
    const DIALECT: Dialect = B::DIALECT;

    async fn fetch(
        &self,
        sql: &str,
        args: &[Value],
        max_rows: Option<usize>,
    ) -> OrmResult<Vec<Row>> {
        self.get()?.fetch(sql, args, max_rows).await
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> OrmResult<u64> {
        self.get()?.execute(sql, args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{execute, select};
    use crate::testing::RecordingBackend;

    #[tokio::test]
    async fn test_query_before_install_fails() {
        let manager: PoolManager<RecordingBackend> = PoolManager::new();
        assert!(!manager.is_initialized());

        let err = select(&manager, "select 1", &[], None).await.unwrap_err();
        assert!(err.is_pool_not_initialized());
        let err = execute(&manager, "delete from `t`", &[]).await.unwrap_err();
        assert!(err.is_pool_not_initialized());
    }

    #[tokio::test]
    async fn test_install_then_query() {
        let manager = PoolManager::new();
        manager.install(RecordingBackend::new()).unwrap();
        assert!(manager.is_initialized());

        let affected = execute(&manager, "delete from `t` where `id`=?", &[Value::Int(1)])
            .await
            .unwrap();
        assert_eq!(affected, 1);
        assert_eq!(
            manager.get().unwrap().last_call().sql,
            "delete from `t` where `id`=?1"
        );
    }

    #[test]
    fn test_second_install_is_rejected() {
        let manager = PoolManager::with_pool(RecordingBackend::new());
        let err = manager.install(RecordingBackend::new()).unwrap_err();
        assert!(matches!(err, OrmError::PoolAlreadyInitialized));
    }
}
