//! This module defines concrete implementations of the [crate::DocumentStore] port

#[cfg(feature = "opensearch")]
pub mod opensearch;

#[cfg(any(test, feature = "mock"))]
pub mod memory;

#[cfg(any(test, feature = "mock"))]
pub mod mock;
