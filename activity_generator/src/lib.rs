#![deny(missing_docs)]
//! This crate generates synthetic [ActivityRecord]s for load and demo purposes.
//!
//! Generation is pure with respect to the injected random source, so seeding the source
//! (e.g. [rand::rngs::StdRng::seed_from_u64](rand::SeedableRng::seed_from_u64)) gives the same
//! records every time.

pub mod config;
pub mod error;
pub mod generate;
pub mod window;

pub use config::{GeneratorConfig, Ipv4Template};
pub use error::GeneratorError;
pub use generate::generate;
pub use models_activity::ActivityRecord;
pub use window::{DefaultTime, TimeGetter, TimeWindow};

/// Result type for this crate
pub type Result<T> = std::result::Result<T, GeneratorError>;
