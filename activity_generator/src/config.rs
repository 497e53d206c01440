//! Distribution parameters for the generated fields

use std::{net::Ipv4Addr, ops::RangeInclusive};

use models_activity::GeoPoint;
use rand::Rng;

use crate::{Result, error::GeneratorError};


/// The user agent used when none are configured
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Synthesizes addresses of the form `a.b.x.y` where `a.b` is fixed and `x`, `y` are drawn
/// uniformly from `host_octets`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv4Template {
    /// The fixed network prefix
    pub prefix: [u8; 2],
    /// The range each of the two host octets is drawn from
    pub host_octets: RangeInclusive<u8>,
}

impl Default for Ipv4Template {
    fn default() -> Self {
        Self {
            prefix: [192, 168],
            host_octets: 1..=255,
        }
    }
}

impl Ipv4Template {
    /// draw one address
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Ipv4Addr {
        let [a, b] = self.prefix;
        let c = rng.random_range(self.host_octets.clone());
        let d = rng.random_range(self.host_octets.clone());
        Ipv4Addr::new(a, b, c, d)
    }
}

/// Distribution parameters for [crate::generate]
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// response time range in milliseconds
    pub response_time_ms: RangeInclusive<f64>,
    /// session duration range in seconds, the upper bound is the configured maximum
    pub session_duration_secs: RangeInclusive<u32>,
    /// template for client addresses
    pub ip_template: Ipv4Template,
    /// candidate locations
    pub locations: Vec<GeoPoint>,
    /// candidate user agents
    pub user_agents: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            response_time_ms: 100.0..=5000.0,
            session_duration_secs: 60..=3600,
            ip_template: Ipv4Template::default(),
            locations: vec![
                GeoPoint::NEW_YORK,
                GeoPoint::SAN_FRANCISCO,
                GeoPoint::LONDON,
                GeoPoint::TOKYO,
                GeoPoint::MUMBAI,
            ],
            user_agents: vec![DEFAULT_USER_AGENT.to_string()],
        }
    }
}

impl GeneratorConfig {
    /// Check every range and candidate list is usable
    pub fn validate(&self) -> Result<()> {
        let (low, high) = (
            *self.response_time_ms.start(),
            *self.response_time_ms.end(),
        );
        if !low.is_finite() || !high.is_finite() || low < 0.0 || low > high {
            return Err(GeneratorError::invalid(
                "response_time_ms",
                format!("expected a finite non-negative range, got {low}..={high}"),
            ));
        }

        let (low, high) = (
            *self.session_duration_secs.start(),
            *self.session_duration_secs.end(),
        );
        if low == 0 || low > high {
            return Err(GeneratorError::invalid(
                "session_duration_secs",
                format!("expected a positive range, got {low}..={high}"),
            ));
        }
        // session_duration is mapped as a signed 32 bit integer
        if high > i32::MAX as u32 {
            return Err(GeneratorError::invalid(
                "session_duration_secs",
                format!("maximum {high} does not fit the integer mapping"),
            ));
        }

        if self.ip_template.host_octets.is_empty() {
            return Err(GeneratorError::invalid(
                "ip_template",
                "host octet range is empty",
            ));
        }

        if self.locations.is_empty() {
            return Err(GeneratorError::invalid("locations", "no candidate locations"));
        }
        if let Some(point) = self.locations.iter().find(|p| !p.in_range()) {
            return Err(GeneratorError::invalid(
                "locations",
                format!("{point:?} is outside the valid coordinate range"),
            ));
        }

        if self.user_agents.is_empty() {
            return Err(GeneratorError::invalid(
                "user_agents",
                "no candidate user agents",
            ));
        }

        Ok(())
    }
}
