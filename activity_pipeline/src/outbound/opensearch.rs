//! [DocumentStore] backed by an OpenSearch cluster

use std::collections::BTreeMap;

use models_activity::{IndexSchema, field_types_from_properties};
use opensearch_client::{BulkItemOutcome, OpensearchClient, error::OpensearchClientError};
use serde_json::Value;

use crate::domain::{error::PipelineError, models::DocumentOutcome, ports::DocumentStore};


impl From<OpensearchClientError> for PipelineError {
    fn from(err: OpensearchClientError) -> Self {
        if err.is_unavailable() {
            PipelineError::Connection {
                details: err.to_string(),
            }
        } else {
            PipelineError::Store {
                details: err.to_string(),
            }
        }
    }
}

impl From<BulkItemOutcome> for DocumentOutcome {
    fn from(outcome: BulkItemOutcome) -> Self {
        match outcome {
            BulkItemOutcome::Indexed { id } => DocumentOutcome::Accepted { id },
            BulkItemOutcome::Rejected { status, reason } => DocumentOutcome::Rejected {
                reason: format!("[{status}] {reason}"),
            },
        }
    }
}

impl DocumentStore for OpensearchClient {
    type Err = OpensearchClientError;

    async fn ping(&self) -> Result<(), Self::Err> {
        OpensearchClient::ping(self).await
    }

    async fn collection_exists(&self, name: &str) -> Result<bool, Self::Err> {
        self.index_exists(name).await
    }

    async fn collection_field_types(
        &self,
        name: &str,
    ) -> Result<BTreeMap<String, String>, Self::Err> {
        let properties = self.index_properties(name).await?;
        Ok(field_types_from_properties(&properties))
    }

    async fn create_collection(&self, name: &str, schema: &IndexSchema) -> Result<bool, Self::Err> {
        match self.create_index(name, schema.to_index_body()).await {
            Ok(()) => Ok(true),
            Err(OpensearchClientError::IndexAlreadyExists { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn bulk_write(
        &self,
        name: &str,
        documents: &[Value],
    ) -> Result<Vec<DocumentOutcome>, Self::Err> {
        let outcomes = self.bulk_index(name, documents).await?;
        Ok(outcomes.into_iter().map(DocumentOutcome::from).collect())
    }

    async fn refresh(&self, name: &str) -> Result<(), Self::Err> {
        self.refresh_index(name).await
    }

    async fn search(&self, name: &str, body: Value) -> Result<Value, Self::Err> {
        self.search_raw(name, body).await
    }
}
