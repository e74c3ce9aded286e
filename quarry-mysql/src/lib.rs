//! MySQL backend for the Quarry ORM.
//!
//! Runs Quarry statements over a `mysql_async` connection pool. MySQL binds
//! the portable `?` placeholder natively, so statements are sent unchanged.
//!
//! # Example
//!
//! ```rust,ignore
//! use quarry_mysql::{MysqlConfig, MysqlPool, create_pool};
//! use quarry_query::PoolManager;
//!
//! static DB: PoolManager<MysqlPool> = PoolManager::new();
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MysqlConfig::new("awesome")
//!         .user("www-data")
//!         .password("www-data");
//!     create_pool(&DB, config).await?;
//!
//!     // Issue queries through &DB...
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod pool;
pub mod types;

pub use config::{DATABASE_URL_ENV, MysqlConfig};
pub use error::{MysqlError, MysqlResult};
pub use pool::{MysqlPool, create_pool};
