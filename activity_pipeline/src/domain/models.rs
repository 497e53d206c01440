//! Models used by the loader

use crate::domain::error::PipelineError;

/// The result of writing one document, as reported by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// The document was stored under `id`
    Accepted {
        /// the store assigned identifier
        id: String,
    },
    /// The document was refused
    Rejected {
        /// why the store refused it
        reason: String,
    },
}

/// A record the store did not accept, together with the reason
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected<T> {
    /// the record as it was submitted
    pub record: T,
    /// why it was not accepted
    pub reason: String,
}

/// The tally of a single submission
#[derive(Debug, Clone, PartialEq)]
pub struct BulkResult<T> {
    /// number of records the store accepted
    pub accepted: usize,
    /// the records that were not accepted, in submission order
    pub rejected: Vec<Rejected<T>>,
}

impl<T> Default for BulkResult<T> {
    fn default() -> Self {
        Self {
            accepted: 0,
            rejected: Vec::new(),
        }
    }
}

impl<T> BulkResult<T> {
    /// number of records that were submitted
    pub fn total(&self) -> usize {
        self.accepted + self.rejected.len()
    }

    /// true when nothing was rejected
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

const DEFAULT_BATCH_SIZE: usize = 500;

/// Tunables for [crate::BulkLoader]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    /// maximum number of documents per bulk request
    pub batch_size: usize,
    /// maximum number of bulk requests in flight at once
    pub concurrency: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            concurrency: 1,
        }
    }
}

impl LoaderConfig {
    /// Both values must be at least one
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.batch_size == 0 {
            return Err(PipelineError::invalid(
                "batch_size",
                "must be greater than zero",
            ));
        }
        if self.concurrency == 0 {
            return Err(PipelineError::invalid(
                "concurrency",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}
