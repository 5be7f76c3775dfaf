use crate::error::Result;
use crate::models::{Collection, Fields, RawRecord};
use async_trait::async_trait;

/// CRUD surface of a tabular record backend.
///
/// Every call is single-shot: implementations never retry.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All rows of a collection, in the backend's view order
    async fn list(&self, collection: Collection) -> Result<Vec<RawRecord>>;

    async fn get(&self, collection: Collection, id: &str) -> Result<RawRecord>;

    /// Insert a row; the returned record carries the assigned id
    async fn create(&self, collection: Collection, fields: Fields) -> Result<RawRecord>;

    /// Replace the row's fields with `fields`
    async fn update(&self, collection: Collection, id: &str, fields: Fields) -> Result<RawRecord>;

    async fn delete(&self, collection: Collection, id: &str) -> Result<()>;

    /// Get the name of the backend, for logs
    fn backend_name(&self) -> &'static str;
}
