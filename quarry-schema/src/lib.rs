//! # quarry-schema
//!
//! Field descriptors and model schemas for the Quarry ORM.
//!
//! This crate provides:
//! - [`Field`] descriptors with the five column presets (string, integer,
//!   boolean, float, text) and static or lazily computed defaults
//! - [`ModelSchema`], built once per model type, holding the column mapping,
//!   the primary key and the four pre-generated CRUD statements
//! - The [`Value`] type that flows between models and database drivers
//!
//! ## Example
//!
//! ```rust
//! use quarry_schema::{Field, ModelSchema};
//!
//! let schema = ModelSchema::builder("User")
//!     .table("users")
//!     .field("id", Field::integer().primary_key())
//!     .field("name", Field::string())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(schema.select_sql(), "select `id`, `name` from `users`");
//! assert_eq!(
//!     schema.insert_sql(),
//!     "insert into `users` (`name`, `id`) values (?, ?)"
//! );
//! ```

pub mod error;
pub mod field;
pub mod model;
pub mod sql;
pub mod value;

pub use error::{ConversionError, SchemaError, SchemaResult};
pub use field::{Field, FieldDefault, FieldKind};
pub use model::{ModelSchema, ModelSchemaBuilder};
pub use sql::{PLACEHOLDER, placeholders, quote_identifier};
pub use value::Value;
