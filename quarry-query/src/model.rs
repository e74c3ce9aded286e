//! Typed models.
//!
//! A [`Model`] is a plain struct whose fields are `Option<T>`: `None` means
//! the attribute is not set. Models convert to and from [`Record`] and get
//! the CRUD helpers for free. Use [`model!`](crate::model!) to declare one.

use std::sync::Arc;

use async_trait::async_trait;

use quarry_schema::{ModelSchema, Value};

use crate::error::OrmResult;
use crate::executor::Backend;
use crate::options::FindOptions;
use crate::record::Record;

/// A struct mapped to one table.
#[async_trait]
pub trait Model: Sized + Send + Sync {
    /// The shared schema of this model.
    fn schema() -> Arc<ModelSchema>;

    /// Copy the set fields into a record.
    fn to_record(&self) -> Record;

    /// Build the model from a record.
    fn from_record(record: &Record) -> OrmResult<Self>;

    /// Find one model by primary key.
    async fn find<B, K>(backend: &B, primary_key: K) -> OrmResult<Option<Self>>
    where
        B: Backend + ?Sized,
        K: Into<Value> + Send,
    {
        let pk = primary_key.into();
        match Record::find(backend, &Self::schema(), pk).await? {
            Some(record) => Self::from_record(&record).map(Some),
            None => Ok(None),
        }
    }

    /// Find all models matching `options`.
    async fn find_all<B>(backend: &B, options: FindOptions) -> OrmResult<Vec<Self>>
    where
        B: Backend + ?Sized,
    {
        Record::find_all(backend, &Self::schema(), options)
            .await?
            .iter()
            .map(Self::from_record)
            .collect()
    }

    /// Evaluate a single select expression over this model's table.
    async fn find_number<B>(
        backend: &B,
        select_expr: &str,
        where_clause: Option<&str>,
        args: &[Value],
    ) -> OrmResult<Option<Value>>
    where
        B: Backend + ?Sized,
    {
        let schema = Self::schema();
        Record::find_number(backend, &schema, select_expr, where_clause, args).await
    }

    /// Insert this model. Resolved defaults are written back into `self`.
    async fn save<B>(&mut self, backend: &B) -> OrmResult<u64>
    where
        B: Backend + ?Sized,
    {
        let mut record = self.to_record();
        let affected = record.save(backend).await?;
        *self = Self::from_record(&record)?;
        Ok(affected)
    }

    /// Write the current fields of this model.
    async fn update<B>(&self, backend: &B) -> OrmResult<u64>
    where
        B: Backend + ?Sized,
    {
        self.to_record().update(backend).await
    }

    /// Delete this model by primary key.
    async fn remove<B>(&self, backend: &B) -> OrmResult<u64>
    where
        B: Backend + ?Sized,
    {
        self.to_record().remove(backend).await
    }
}
