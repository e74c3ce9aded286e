//! Model schemas: the table mapping and CRUD statements of one model type.

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::{SchemaError, SchemaResult};
use crate::field::Field;
use crate::sql::{self, quote_identifier};

/// Immutable table metadata for one model type.
///
/// Built once through [`ModelSchema::builder`]; all instances of the model
/// share it (usually behind an `Arc`).
#[derive(Debug, Clone)]
pub struct ModelSchema {
    model_name: String,
    table: String,
    mappings: IndexMap<String, Field>,
    primary_key: String,
    fields: Vec<String>,
    select_sql: String,
    insert_sql: String,
    update_sql: String,
    delete_sql: String,
}

impl ModelSchema {
    /// Start declaring a model.
    pub fn builder(model_name: impl Into<String>) -> ModelSchemaBuilder {
        ModelSchemaBuilder::new(model_name)
    }

    /// The declared model name.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// The table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// All fields, keyed by attribute name, in declaration order.
    pub fn mappings(&self) -> &IndexMap<String, Field> {
        &self.mappings
    }

    /// Look up a field by attribute name.
    pub fn field(&self, attribute: &str) -> Option<&Field> {
        self.mappings.get(attribute)
    }

    /// Attribute name of the primary key.
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// The primary key field.
    pub fn primary_key_field(&self) -> &Field {
        &self.mappings[self.primary_key.as_str()]
    }

    /// Attribute names of the regular (non primary key) fields, in
    /// declaration order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Column name for an attribute: the field's override or the attribute
    /// name itself.
    pub fn column_for<'a>(&'a self, attribute: &'a str) -> Option<&'a str> {
        self.mappings
            .get(attribute)
            .map(|field| field.column_name().unwrap_or(attribute))
    }

    /// Attribute name for a column returned by the database.
    pub fn attribute_for(&self, column: &str) -> Option<&str> {
        self.mappings
            .iter()
            .find(|(attr, field)| field.column_name().unwrap_or(attr.as_str()) == column)
            .map(|(attr, _)| attr.as_str())
    }

    /// `select <pk>, <fields..> from <table>`
    pub fn select_sql(&self) -> &str {
        &self.select_sql
    }

    /// `insert into <table> (<fields..>, <pk>) values (?, ..)`
    pub fn insert_sql(&self) -> &str {
        &self.insert_sql
    }

    /// `update <table> set <field>=?, .. where <pk>=?`
    pub fn update_sql(&self) -> &str {
        &self.update_sql
    }

    /// `delete from <table> where <pk>=?`
    pub fn delete_sql(&self) -> &str {
        &self.delete_sql
    }

    /// DDL creating the model's table.
    pub fn create_table_sql(&self) -> String {
        let pk_column = self.column_for(&self.primary_key).unwrap_or(&self.primary_key);
        let mut columns: Vec<String> = Vec::with_capacity(self.mappings.len() + 1);
        for (attr, field) in &self.mappings {
            let column = quote_identifier(field.column_name().unwrap_or(attr));
            if field.is_primary_key() {
                columns.push(format!("{} {} not null", column, field.column_type()));
            } else {
                columns.push(format!("{} {}", column, field.column_type()));
            }
        }
        columns.push(format!("primary key ({})", quote_identifier(pk_column)));
        format!(
            "create table {} ({})",
            quote_identifier(&self.table),
            columns.join(", ")
        )
    }
}

/// Collects an ordered list of field descriptors and validates them into a
/// [`ModelSchema`].
#[derive(Debug, Clone)]
pub struct ModelSchemaBuilder {
    model_name: String,
    table: Option<String>,
    fields: Vec<(String, Field)>,
}

impl ModelSchemaBuilder {
    /// Create a builder for the named model.
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            table: None,
            fields: Vec::new(),
        }
    }

    /// Override the table name (defaults to the model name).
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Declare a field. Declaration order is the column order of every
    /// generated statement.
    pub fn field(mut self, attribute: impl Into<String>, field: Field) -> Self {
        self.fields.push((attribute.into(), field));
        self
    }

    /// Validate the declared fields and generate the CRUD statements.
    pub fn build(self) -> SchemaResult<ModelSchema> {
        let model = self.model_name;
        let table = self.table.unwrap_or_else(|| model.clone());
        info!(model = %model, table = %table, "found model");

        let mut mappings: IndexMap<String, Field> = IndexMap::with_capacity(self.fields.len());
        let mut primary_key: Option<String> = None;
        let mut fields = Vec::new();

        for (attribute, field) in self.fields {
            debug!(attribute = %attribute, field = %field, "found mapping");

            let column = field.column_name().unwrap_or(&attribute);
            let column_taken = mappings
                .iter()
                .any(|(attr, f)| f.column_name().unwrap_or(attr) == column);
            if mappings.contains_key(&attribute) || column_taken {
                return Err(SchemaError::DuplicateField {
                    model,
                    field: attribute,
                });
            }

            if field.is_primary_key() {
                if primary_key.is_some() {
                    return Err(SchemaError::DuplicatePrimaryKey {
                        model,
                        field: attribute,
                    });
                }
                if !field.kind().can_be_primary_key() {
                    return Err(SchemaError::InvalidPrimaryKey {
                        model,
                        field: attribute,
                        column_type: field.column_type().to_string(),
                    });
                }
                primary_key = Some(attribute.clone());
            } else {
                fields.push(attribute.clone());
            }
            mappings.insert(attribute, field);
        }

        let Some(primary_key) = primary_key else {
            return Err(SchemaError::MissingPrimaryKey { model });
        };

        let column = |attr: &str| -> String {
            mappings[attr].column_name().unwrap_or(attr).to_string()
        };
        let pk_column = column(primary_key.as_str());
        let columns: Vec<String> = fields.iter().map(|f| column(f.as_str())).collect();
        let columns: Vec<&str> = columns.iter().map(String::as_str).collect();

        Ok(ModelSchema {
            select_sql: sql::select_template(&table, &pk_column, &columns),
            insert_sql: sql::insert_template(&table, &pk_column, &columns),
            update_sql: sql::update_template(&table, &pk_column, &columns),
            delete_sql: sql::delete_template(&table, &pk_column),
            model_name: model,
            table,
            mappings,
            primary_key,
            fields,
        })
    }
}
