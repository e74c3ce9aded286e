//! SQLite backend for the Quarry ORM.
//!
//! Runs Quarry statements through `tokio-rusqlite`, which moves each call
//! onto the connection's own thread. Portable `?` placeholders are sent as
//! numbered `?1`, `?2`, ... markers.
//!
//! # Example
//!
//! ```rust,ignore
//! use quarry_query::PoolManager;
//! use quarry_sqlite::{SqliteConfig, SqlitePool, create_pool};
//!
//! static DB: PoolManager<SqlitePool> = PoolManager::new();
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     create_pool(&DB, SqliteConfig::from_url("sqlite://./awesome.db")?).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
mod connection;
pub mod error;
pub mod pool;
pub mod types;

pub use config::{DatabasePath, JournalMode, SqliteConfig};
pub use error::{SqliteError, SqliteResult};
pub use pool::{SqlitePool, create_pool};
