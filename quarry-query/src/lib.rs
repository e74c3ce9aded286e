//! # quarry-query
//!
//! Records, typed models and the async query executor of the Quarry ORM.
//!
//! This crate provides:
//! - [`PoolManager`], the process-wide connection pool slot
//! - [`select`] and [`execute`], parameterized statements with portable `?`
//!   placeholders translated per backend [`Dialect`]
//! - [`Record`], a dynamic model instance with `find`, `find_all`,
//!   `find_number`, `save`, `update` and `remove`
//! - [`Model`] and the [`model!`] macro for typed models
//!
//! ## Records
//!
//! ```rust
//! use std::sync::Arc;
//! use quarry_query::{Field, ModelSchema, Record, Value};
//!
//! let schema = Arc::new(
//!     ModelSchema::builder("User")
//!         .table("users")
//!         .field("id", Field::integer().primary_key())
//!         .field("name", Field::text())
//!         .field("admin", Field::boolean())
//!         .build()
//!         .unwrap(),
//! );
//!
//! let mut user = Record::with_values(schema, [("id", Value::Int(1))]);
//! user.set("name", "alice");
//!
//! assert!(user.get("admin").is_err());
//! assert_eq!(user.get_value_or_default("admin").unwrap(), Some(Value::Bool(false)));
//! ```
//!
//! ## Find options
//!
//! ```rust
//! use quarry_query::{FindOptions, Limit};
//!
//! let options = FindOptions::new()
//!     .filter("`admin`=?")
//!     .arg(true)
//!     .order_by("`id` desc")
//!     .limit(Limit::range(10, 5));
//! assert_eq!(options.args.len(), 1);
//! ```
//!
//! ## Placeholders
//!
//! ```rust
//! use quarry_query::{Dialect, translate_placeholders};
//!
//! let sql = "select `id` from `users` where `id`=? and `name`=?";
//! assert_eq!(translate_placeholders(sql, Dialect::MySql), sql);
//! assert_eq!(
//!     translate_placeholders(sql, Dialect::Sqlite),
//!     "select `id` from `users` where `id`=?1 and `name`=?2"
//! );
//! ```

pub mod error;
pub mod executor;
pub mod logging;
#[macro_use]
pub mod macros;
pub mod model;
pub mod options;
pub mod pool;
pub mod record;
pub mod sql;

#[cfg(test)]
mod testing;

pub use quarry_schema::{
    ConversionError, Field, FieldDefault, FieldKind, ModelSchema, ModelSchemaBuilder,
    SchemaError, Value, placeholders, quote_identifier,
};

pub use error::{BoxError, OrmError, OrmResult};
pub use executor::{Backend, Row, execute, select};
pub use model::Model;
pub use options::{FindOptions, Limit};
pub use pool::PoolManager;
pub use record::Record;
pub use sql::{Dialect, translate_placeholders};

/// Re-exports for declaring and querying models.
pub mod prelude {
    pub use crate::error::{OrmError, OrmResult};
    pub use crate::executor::Backend;
    pub use crate::model::Model;
    pub use crate::options::{FindOptions, Limit};
    pub use crate::pool::PoolManager;
    pub use crate::record::Record;
    pub use quarry_schema::{Field, ModelSchema, Value};
}
