//! This module defines the port the loader requires from a document store

use std::collections::BTreeMap;

use models_activity::IndexSchema;
use serde_json::Value;

use crate::domain::models::DocumentOutcome;

/// Trait for interacting with a remote document store.
/// Collections are named groups of documents, e.g. an index.
pub trait DocumentStore: Send + Sync + 'static {
    /// The error type that can occur
    type Err: std::error::Error + Send + Sync + 'static;

    /// liveness check
    fn ping(&self) -> impl Future<Output = Result<(), Self::Err>> + Send;

    /// whether the named collection exists
    fn collection_exists(&self, name: &str) -> impl Future<Output = Result<bool, Self::Err>> + Send;

    /// `field -> type` of the top level fields currently mapped in the collection
    fn collection_field_types(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<BTreeMap<String, String>, Self::Err>> + Send;

    /// create the collection with the given schema and settings.
    /// Returns false if the collection already existed, in which case nothing was changed.
    fn create_collection(
        &self,
        name: &str,
        schema: &IndexSchema,
    ) -> impl Future<Output = Result<bool, Self::Err>> + Send;

    /// write every document in one request, returning one outcome per document in order
    fn bulk_write(
        &self,
        name: &str,
        documents: &[Value],
    ) -> impl Future<Output = Result<Vec<DocumentOutcome>, Self::Err>> + Send;

    /// make previous writes visible to search
    fn refresh(&self, name: &str) -> impl Future<Output = Result<(), Self::Err>> + Send;

    /// run a search, the body is forwarded verbatim and the raw response returned
    fn search(
        &self,
        name: &str,
        body: Value,
    ) -> impl Future<Output = Result<Value, Self::Err>> + Send;
}
