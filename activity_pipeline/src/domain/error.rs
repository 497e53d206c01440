//! The errors surfaced to whoever orchestrates a load

use activity_generator::GeneratorError;
use models_activity::FieldConflict;
use thiserror::Error;

/// Everything that can stop a pipeline operation.
/// Rejected documents are not errors, they are reported in [crate::BulkResult].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// An input to the pipeline is not usable
    #[error("invalid argument. argument: {argument} details: {details}")]
    InvalidArgument {
        /// the name of the offending argument
        argument: &'static str,
        /// what is wrong with it
        details: String,
    },

    /// The store could not be reached, retries included
    #[error("unable to reach the document store: {details}")]
    Connection {
        /// the underlying failure
        details: String,
    },

    /// The collection exists but maps some fields differently
    #[error(
        "collection {collection} exists with an incompatible schema: {}",
        describe_conflicts(.conflicts)
    )]
    SchemaConflict {
        /// the collection name
        collection: String,
        /// every field that disagrees
        conflicts: Vec<FieldConflict>,
    },

    /// The store refused a request for a reason retrying will not fix
    #[error("the document store refused the request: {details}")]
    Store {
        /// the underlying failure
        details: String,
    },
}

fn describe_conflicts(conflicts: &[FieldConflict]) -> String {
    conflicts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<GeneratorError> for PipelineError {
    fn from(err: GeneratorError) -> Self {
        match err {
            GeneratorError::InvalidArgument { argument, details } => {
                PipelineError::InvalidArgument { argument, details }
            }
        }
    }
}

impl PipelineError {
    pub(crate) fn invalid(argument: &'static str, details: impl Into<String>) -> Self {
        PipelineError::InvalidArgument {
            argument,
            details: details.into(),
        }
    }

    /// true when the failure means the store is unreachable
    pub fn is_connection(&self) -> bool {
        matches!(self, PipelineError::Connection { .. })
    }
}
