//! The activity record, which is the unit of ingestion

use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};

use crate::entity::{Department, Entity};


/// What the user did
#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    Eq,
    PartialEq,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::VariantArray,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// The user logged in
    Login,
    /// The user logged out
    Logout,
    /// The user uploaded a file
    FileUpload,
    /// The user downloaded a file
    FileDownload,
    /// The user called an api
    ApiCall,
    /// The user ran a database query
    DatabaseQuery,
}

/// How the action ended
#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    Eq,
    PartialEq,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::VariantArray,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// The action succeeded
    Success,
    /// The action failed
    Failed,
    /// The action did not finish in time
    Timeout,
}

/// A point on the globe, serialized in the object form accepted by `geo_point`
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    /// latitude in degrees
    pub lat: f64,
    /// longitude in degrees
    pub lon: f64,
}

impl GeoPoint {
    /// New York
    pub const NEW_YORK: GeoPoint = GeoPoint::new(40.7128, -74.0060);
    /// San Francisco
    pub const SAN_FRANCISCO: GeoPoint = GeoPoint::new(37.7749, -122.4194);
    /// London
    pub const LONDON: GeoPoint = GeoPoint::new(51.5074, -0.1278);
    /// Tokyo
    pub const TOKYO: GeoPoint = GeoPoint::new(35.6762, 139.6503);
    /// Mumbai
    pub const MUMBAI: GeoPoint = GeoPoint::new(19.0760, 72.8777);

    /// create a new point. Use [GeoPoint::in_range] to check the coordinates.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// true when `lat` is within [-90, 90] and `lon` within [-180, 180]
    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// A single synthetic user activity
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ActivityRecord {
    /// When the activity happened, millisecond precision
    #[serde(with = "crate::timestamp_format")]
    pub timestamp: DateTime<Utc>,
    /// The id of the acting user
    pub user_id: String,
    /// The name of the acting user
    pub user_name: String,
    /// What the user did
    pub action: Action,
    /// The department of the acting user
    pub department: Department,
    /// How the action ended
    pub status: Status,
    /// How long the action took, in milliseconds
    pub response_time: f64,
    /// The client address
    pub ip_address: Ipv4Addr,
    /// The client user agent
    pub user_agent: String,
    /// Where the request came from
    pub location: GeoPoint,
    /// Length of the session the activity belongs to, in seconds
    pub session_duration: u32,
}

impl ActivityRecord {
    /// true if the record was produced by `entity`
    pub fn belongs_to(&self, entity: &Entity) -> bool {
        self.user_id == entity.id
            && self.user_name == entity.name
            && self.department == entity.department
    }
}
