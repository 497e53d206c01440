#![deny(missing_docs)]
//! This crate contains the models for synthetic user activity records.
//! It is shared by the generator, the loader and the reporting binary.
//! This crate should never talk to the network.

pub mod entity;
pub mod record;
pub mod schema;
pub mod timestamp_format;

pub use entity::{Department, Entity, default_population};
pub use record::{Action, ActivityRecord, GeoPoint, Status};
pub use schema::{
    FieldConflict, FieldType, IndexSchema, IndexSettings, activity_index_schema,
    field_types_from_properties,
};

/// The default name of the activity index
pub static ACTIVITY_INDEX: &str = "user_activity_logs";
