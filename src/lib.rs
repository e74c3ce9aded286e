//! # Quarry
//!
//! A small async ORM: declarative field descriptors become a table schema
//! with pre-generated CRUD statements, and model instances run those
//! statements through a shared connection pool.
//!
//! Quarry provides:
//! - Field descriptors and model schemas ([`schema`])
//! - Dynamic records, typed models and the query executor ([`query`])
//! - A MySQL backend (feature `mysql`, on by default)
//! - A SQLite backend (feature `sqlite`)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use quarry::prelude::*;
//! use quarry::mysql::{MysqlConfig, MysqlPool, create_pool};
//!
//! quarry::model! {
//!     pub struct User in "users" {
//!         id: i64 = Field::integer().primary_key(),
//!         name: String = Field::string().ddl("varchar(50)"),
//!     }
//! }
//!
//! static DB: PoolManager<MysqlPool> = PoolManager::new();
//!
//! #[tokio::main]
//! async fn main() -> Result<(), OrmError> {
//!     create_pool(&DB, MysqlConfig::new("awesome").user("www").password("www")).await?;
//!
//!     let mut user = User { id: Some(1), name: Some("a".into()) };
//!     user.save(&DB).await?;
//!
//!     let found = User::find(&DB, 1).await?;
//!     assert_eq!(found, Some(user));
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Field descriptors, model schemas and SQL templates.
pub mod schema {
    pub use quarry_schema::*;
}

/// Records, typed models, the pool manager and the query executor.
pub mod query {
    pub use quarry_query::*;
}

/// MySQL backend.
#[cfg(feature = "mysql")]
#[cfg_attr(docsrs, doc(cfg(feature = "mysql")))]
pub mod mysql {
    pub use quarry_mysql::*;
}

/// SQLite backend.
#[cfg(feature = "sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "sqlite")))]
pub mod sqlite {
    pub use quarry_sqlite::*;
}

pub use quarry_query::model;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use quarry_query::prelude::*;
    pub use quarry_query::{execute, select};
}

// Re-export key types at the crate root
pub use quarry_query::{
    Backend, Field, FindOptions, Limit, Model, ModelSchema, OrmError, OrmResult, PoolManager,
    Record, SchemaError, Value,
};
