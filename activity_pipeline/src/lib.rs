#![deny(missing_docs)]
//! This crate loads documents into a document store in bulk, following the hexagonal
//! architecture pattern. [domain] holds the loader and the [DocumentStore] port it is
//! written against, [outbound] the concrete stores.

pub mod domain;
pub mod outbound;

pub use domain::{
    error::PipelineError,
    models::{BulkResult, DocumentOutcome, LoaderConfig, Rejected},
    ports::DocumentStore,
    services::BulkLoader,
};
