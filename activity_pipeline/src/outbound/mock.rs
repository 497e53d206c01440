//! This module provides an [mockall::mock] concrete struct [MockDocumentStore] which can be used for testing
use std::collections::BTreeMap;

use mockall::mock;
use models_activity::IndexSchema;
use serde_json::Value;

use crate::domain::{error::PipelineError, models::DocumentOutcome, ports::DocumentStore};

const _NOT_PROD: () = const {
    assert!(
        cfg!(debug_assertions),
        "You are trying to include mock code in a production build please run `cargo tree -i activity_pipeline -e features -p <FAILING_PACKAGE>` to see how the mock feature is being included in [dependencies]"
    );
};

/// error type of [MockDocumentStore]
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum MockStoreError {
    /// maps to [PipelineError::Connection]
    #[error("store unavailable")]
    Unavailable,
    /// maps to [PipelineError::Store]
    #[error("store refused the request")]
    Refused,
}

impl From<MockStoreError> for PipelineError {
    fn from(err: MockStoreError) -> Self {
        let details = err.to_string();
        match err {
            MockStoreError::Unavailable => PipelineError::Connection { details },
            MockStoreError::Refused => PipelineError::Store { details },
        }
    }
}

mock! {
    pub DocumentStore {}
    impl DocumentStore for DocumentStore {
        type Err = MockStoreError;

        fn ping(&self) -> impl Future<Output = Result<(), MockStoreError>> + Send;

        fn collection_exists(&self, name: &str) -> impl Future<Output = Result<bool, MockStoreError>> + Send;

        fn collection_field_types(
            &self,
            name: &str,
        ) -> impl Future<Output = Result<BTreeMap<String, String>, MockStoreError>> + Send;

        fn create_collection(
            &self,
            name: &str,
            schema: &IndexSchema,
        ) -> impl Future<Output = Result<bool, MockStoreError>> + Send;

        fn bulk_write(
            &self,
            name: &str,
            documents: &[Value],
        ) -> impl Future<Output = Result<Vec<DocumentOutcome>, MockStoreError>> + Send;

        fn refresh(&self, name: &str) -> impl Future<Output = Result<(), MockStoreError>> + Send;

        fn search(&self, name: &str, body: Value) -> impl Future<Output = Result<Value, MockStoreError>> + Send;
    }
}
