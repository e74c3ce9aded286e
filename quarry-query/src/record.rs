//! Dynamic model instances.
//!
//! A [`Record`] is an ordered attribute → [`Value`] map bound to one
//! [`ModelSchema`]. An attribute that was never set is *absent*, which is
//! not the same as holding [`Value::Null`].
//!
//! ```rust,ignore
//! let schema = Arc::new(
//!     ModelSchema::builder("User")
//!         .table("users")
//!         .field("id", Field::integer().primary_key())
//!         .field("name", Field::text())
//!         .build()?,
//! );
//!
//! let mut user = Record::with_values(schema.clone(), [("id", 1.into()), ("name", "a".into())]);
//! user.save(&DB).await?;
//!
//! let found = Record::find(&DB, &schema, 1).await?;
//! ```

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use quarry_schema::{ConversionError, ModelSchema, Value, quote_identifier};

use crate::error::{OrmError, OrmResult};
use crate::executor::{self, Backend, Row};
use crate::options::FindOptions;

/// Column alias used by [`Record::find_number`].
const NUMBER_ALIAS: &str = "_num_";

/// A mutable model instance.
#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<ModelSchema>,
    values: IndexMap<String, Value>,
}

impl Record {
    /// Create an empty record.
    pub fn new(schema: Arc<ModelSchema>) -> Self {
        Self {
            schema,
            values: IndexMap::new(),
        }
    }

    /// Create a record with initial values.
    pub fn with_values<K, I>(schema: Arc<ModelSchema>, values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self {
            schema,
            values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Materialize a result row, mapping columns back to attributes and
    /// coercing each value to its field kind. Columns that match no field
    /// are kept under their column name.
    pub fn from_row(schema: Arc<ModelSchema>, row: Row) -> OrmResult<Self> {
        let mut values = IndexMap::with_capacity(row.len());
        for (column, value) in row {
            match schema.attribute_for(&column) {
                Some(attribute) => {
                    let field = &schema.mappings()[attribute];
                    let value = field
                        .kind()
                        .coerce(value)
                        .map_err(|source| OrmError::TypeConversion {
                            field: attribute.to_string(),
                            source,
                        })?;
                    values.insert(attribute.to_string(), value);
                }
                None => {
                    values.insert(column, value);
                }
            }
        }
        Ok(Self { schema, values })
    }

    /// The schema this record belongs to.
    pub fn schema(&self) -> &Arc<ModelSchema> {
        &self.schema
    }

    /// All present values, in insertion order.
    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    /// Set an attribute, returning the previous value if there was one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Check whether an attribute holds a value (`Null` included).
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Read an attribute. Absent attributes are an error.
    pub fn get(&self, key: &str) -> OrmResult<&Value> {
        self.values.get(key).ok_or_else(|| OrmError::NoSuchAttribute {
            model: self.schema.model_name().to_string(),
            attribute: key.to_string(),
        })
    }

    /// Read an attribute, or `None` if it is absent.
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Read an attribute converted to `T`. Absent and `Null` both read as
    /// `None`.
    pub fn get_as<T>(&self, key: &str) -> OrmResult<Option<T>>
    where
        T: TryFrom<Value, Error = ConversionError>,
    {
        match self.values.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::try_from(value.clone())
                .map(Some)
                .map_err(|source| OrmError::TypeConversion {
                    field: key.to_string(),
                    source,
                }),
        }
    }

    /// Read an attribute, falling back to the field default.
    ///
    /// A resolved default is stored on the record, so a factory runs at most
    /// once per record. A field with no value and no default reads as `None`.
    pub fn get_value_or_default(&mut self, key: &str) -> OrmResult<Option<Value>> {
        if let Some(value) = self.values.get(key) {
            return Ok(Some(value.clone()));
        }

        let field = self
            .schema
            .field(key)
            .ok_or_else(|| OrmError::UnknownField {
                model: self.schema.model_name().to_string(),
                field: key.to_string(),
            })?;

        let Some(default) = field.default_value() else {
            return Ok(None);
        };
        let value = default.resolve();
        debug!(attribute = key, value = %value, "using default value");
        self.values.insert(key.to_string(), value.clone());
        Ok(Some(value))
    }

    /// The primary key value, if present.
    pub fn primary_key_value(&self) -> Option<&Value> {
        self.values.get(self.schema.primary_key())
    }

    /// Select records matching `options`.
    pub async fn find_all<B>(
        backend: &B,
        schema: &Arc<ModelSchema>,
        options: FindOptions,
    ) -> OrmResult<Vec<Record>>
    where
        B: Backend + ?Sized,
    {
        let (sql, args) = options.render(schema.select_sql())?;
        let rows = executor::select(backend, &sql, &args, None).await?;
        rows.into_iter()
            .map(|row| Record::from_row(schema.clone(), row))
            .collect()
    }

    /// Evaluate a single select expression such as `count(id)`.
    ///
    /// Returns `None` when no row matched.
    pub async fn find_number<B>(
        backend: &B,
        schema: &ModelSchema,
        select_expr: &str,
        where_clause: Option<&str>,
        args: &[Value],
    ) -> OrmResult<Option<Value>>
    where
        B: Backend + ?Sized,
    {
        let mut sql = format!(
            "select {} as {} from {}",
            select_expr,
            quote_identifier(NUMBER_ALIAS),
            quote_identifier(schema.table())
        );
        if let Some(condition) = where_clause.filter(|c| !c.is_empty()) {
            sql.push_str(" where ");
            sql.push_str(condition);
        }

        let rows = executor::select(backend, &sql, args, Some(1)).await?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|mut row| row.shift_remove(NUMBER_ALIAS)))
    }

    /// Select one record by primary key.
    pub async fn find<B, K>(
        backend: &B,
        schema: &Arc<ModelSchema>,
        primary_key: K,
    ) -> OrmResult<Option<Record>>
    where
        B: Backend + ?Sized,
        K: Into<Value>,
    {
        let pk = primary_key.into();
        let pk_column = schema
            .column_for(schema.primary_key())
            .unwrap_or(schema.primary_key());
        let sql = format!(
            "{} where {}=?",
            schema.select_sql(),
            quote_identifier(pk_column)
        );

        let rows = executor::select(backend, &sql, &[pk], Some(1)).await?;
        rows.into_iter()
            .next()
            .map(|row| Record::from_row(schema.clone(), row))
            .transpose()
    }

    /// Insert this record, filling defaults for absent fields.
    ///
    /// Returns the affected row count; anything other than 1 is logged as a
    /// warning.
    pub async fn save<B>(&mut self, backend: &B) -> OrmResult<u64>
    where
        B: Backend + ?Sized,
    {
        let schema = self.schema.clone();
        let mut args = Vec::with_capacity(schema.fields().len() + 1);
        for attribute in schema.fields() {
            args.push(self.get_value_or_default(attribute)?.unwrap_or(Value::Null));
        }
        args.push(
            self.get_value_or_default(schema.primary_key())?
                .unwrap_or(Value::Null),
        );

        let affected = executor::execute(backend, schema.insert_sql(), &args).await?;
        if affected != 1 {
            warn!(model = schema.model_name(), affected, "failed to insert record");
        }
        Ok(affected)
    }

    /// Write the current values of this record. Absent fields are written
    /// as `NULL`; defaults are not applied.
    pub async fn update<B>(&self, backend: &B) -> OrmResult<u64>
    where
        B: Backend + ?Sized,
    {
        let mut args: Vec<Value> = self
            .schema
            .fields()
            .iter()
            .map(|attribute| self.get_value(attribute).cloned().unwrap_or(Value::Null))
            .collect();
        args.push(self.primary_key_value().cloned().unwrap_or(Value::Null));

        let affected = executor::execute(backend, self.schema.update_sql(), &args).await?;
        if affected != 1 {
            warn!(
                model = self.schema.model_name(),
                affected, "failed to update by primary key"
            );
        }
        Ok(affected)
    }

    /// Delete this record by primary key.
    pub async fn remove<B>(&self, backend: &B) -> OrmResult<u64>
    where
        B: Backend + ?Sized,
    {
        let args = [self.primary_key_value().cloned().unwrap_or(Value::Null)];
        let affected = executor::execute(backend, self.schema.delete_sql(), &args).await?;
        if affected != 1 {
            warn!(
                model = self.schema.model_name(),
                affected, "failed to remove by primary key"
            );
        }
        Ok(affected)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.schema.model_name() == other.schema.model_name() && self.values == other.values
    }
}

/// Serializes as a map of the present attributes.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(&self.values)
    }
}
