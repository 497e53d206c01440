//! This module defines the loader exposed by this crate

use futures::{StreamExt, TryStreamExt, stream};
use models_activity::IndexSchema;
use serde::Serialize;
use serde_json::Value;

use crate::domain::{
    error::PipelineError,
    models::{BulkResult, DocumentOutcome, LoaderConfig, Rejected},
    ports::DocumentStore,
};


/// Writes records into a [DocumentStore] in batches and makes sure the target collection
/// exists with a compatible schema.
#[derive(Debug, Clone)]
pub struct BulkLoader<S> {
    store: S,
    config: LoaderConfig,
}

fn validate_collection(name: &str) -> Result<(), PipelineError> {
    if name.trim().is_empty() {
        return Err(PipelineError::invalid(
            "collection",
            "collection name must not be empty",
        ));
    }
    Ok(())
}

impl<S> BulkLoader<S>
where
    S: DocumentStore,
    PipelineError: From<S::Err>,
{
    /// create a new loader over `store`
    pub fn new(store: S, config: LoaderConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(BulkLoader { store, config })
    }

    /// the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// the loader configuration
    pub fn config(&self) -> LoaderConfig {
        self.config
    }

    /// liveness check against the store
    #[tracing::instrument(err, skip(self))]
    pub async fn ping(&self) -> Result<(), PipelineError> {
        Ok(self.store.ping().await?)
    }

    /// Makes sure `name` exists with `schema`.
    /// Returns true if the collection was created by this call. An existing collection is left
    /// untouched, but every field `schema` names must already be mapped with the same type.
    #[tracing::instrument(err, skip(self, schema))]
    pub async fn ensure_collection(
        &self,
        name: &str,
        schema: &IndexSchema,
    ) -> Result<bool, PipelineError> {
        validate_collection(name)?;

        if self.store.collection_exists(name).await? {
            self.verify_schema(name, schema).await?;
            tracing::debug!("collection already exists");
            return Ok(false);
        }

        let created = self.store.create_collection(name, schema).await?;
        if created {
            tracing::info!("created collection");
        } else {
            // lost a race with another creator
            self.verify_schema(name, schema).await?;
        }
        Ok(created)
    }

    async fn verify_schema(&self, name: &str, schema: &IndexSchema) -> Result<(), PipelineError> {
        let existing = self.store.collection_field_types(name).await?;
        let conflicts = schema.conflicts(&existing);
        if conflicts.is_empty() {
            return Ok(());
        }
        tracing::error!(?conflicts, "collection schema conflict");
        Err(PipelineError::SchemaConflict {
            collection: name.to_string(),
            conflicts,
        })
    }

    /// Writes `records` to `name` in batches of `batch_size`.
    /// Documents the store refuses are reported in the result, in input order, and never abort
    /// the submission. A record that fails to serialize is rejected without being sent.
    /// Failing to reach the store aborts the whole submission.
    /// Written documents are not searchable until [Self::refresh] is called.
    #[tracing::instrument(err, skip(self, records), fields(count = records.len()))]
    pub async fn submit<T: Serialize>(
        &self,
        name: &str,
        records: Vec<T>,
    ) -> Result<BulkResult<T>, PipelineError> {
        validate_collection(name)?;

        if records.is_empty() {
            return Ok(BulkResult::default());
        }

        let mut outcomes: Vec<Option<DocumentOutcome>> = vec![None; records.len()];
        let mut positions = Vec::with_capacity(records.len());
        let mut documents = Vec::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            match serde_json::to_value(record) {
                Ok(document) => {
                    positions.push(position);
                    documents.push(document);
                }
                Err(err) => {
                    outcomes[position] = Some(DocumentOutcome::Rejected {
                        reason: format!("failed to serialize document: {err}"),
                    });
                }
            }
        }

        let written: Vec<Vec<DocumentOutcome>> =
            stream::iter(documents.chunks(self.config.batch_size).enumerate())
                .map(|(batch, chunk)| self.write_batch(name, batch, chunk))
                .buffered(self.config.concurrency)
                .try_collect()
                .await?;

        for (position, outcome) in positions.into_iter().zip(written.into_iter().flatten()) {
            outcomes[position] = Some(outcome);
        }

        let mut result = BulkResult::default();
        for (record, outcome) in records.into_iter().zip(outcomes) {
            match outcome {
                Some(DocumentOutcome::Accepted { .. }) => result.accepted += 1,
                Some(DocumentOutcome::Rejected { reason }) => {
                    result.rejected.push(Rejected { record, reason })
                }
                None => {
                    return Err(PipelineError::Store {
                        details: "store did not report an outcome for every document".to_string(),
                    });
                }
            }
        }

        if result.is_complete() {
            tracing::info!(accepted = result.accepted, "submission complete");
        } else {
            tracing::warn!(
                accepted = result.accepted,
                rejected = result.rejected.len(),
                "submission partially rejected"
            );
        }
        Ok(result)
    }

    async fn write_batch(
        &self,
        name: &str,
        batch: usize,
        documents: &[Value],
    ) -> Result<Vec<DocumentOutcome>, PipelineError> {
        tracing::debug!(batch, size = documents.len(), "writing batch");
        let outcomes = self.store.bulk_write(name, documents).await?;
        if outcomes.len() != documents.len() {
            return Err(PipelineError::Store {
                details: format!(
                    "batch {batch} returned {} outcomes for {} documents",
                    outcomes.len(),
                    documents.len()
                ),
            });
        }
        Ok(outcomes)
    }

    /// make everything written so far visible to search
    #[tracing::instrument(err, skip(self))]
    pub async fn refresh(&self, name: &str) -> Result<(), PipelineError> {
        validate_collection(name)?;
        Ok(self.store.refresh(name).await?)
    }

    /// run a raw search against `name`
    #[tracing::instrument(err, skip(self, body))]
    pub async fn search(&self, name: &str, body: Value) -> Result<Value, PipelineError> {
        validate_collection(name)?;
        Ok(self.store.search(name, body).await?)
    }
}
