//! The historical window record timestamps are sampled from

use chrono::{DateTime, Duration, Utc};
use models_activity::timestamp_format::truncate_to_millis;

use crate::{Result, error::GeneratorError};


/// port for getting the current system time.
/// Having a trait allows tests to pin "now".
pub trait TimeGetter: Send + Sync + 'static {
    /// get the current system time
    fn now(&self) -> DateTime<Utc>;
}

/// The default implementation of time
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTime;

impl TimeGetter for DefaultTime {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// An inclusive time range `[start, end]`. Both bounds are kept at millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

fn ceil_to_millis(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    let truncated = truncate_to_millis(timestamp);
    if truncated < timestamp {
        truncated + Duration::milliseconds(1)
    } else {
        truncated
    }
}

impl TimeWindow {
    /// create a new window, failing if `start` is after `end`.
    /// `start` is rounded up and `end` down so the window never grows past the requested range.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(GeneratorError::invalid(
                "window",
                format!("start {start} is after end {end}"),
            ));
        }
        let start = ceil_to_millis(start);
        let end = truncate_to_millis(end);
        if start > end {
            return Err(GeneratorError::invalid(
                "window",
                format!("no whole millisecond between {start} and {end}"),
            ));
        }
        Ok(Self { start, end })
    }

    /// the window `[now - length, now]`
    pub fn trailing(now: DateTime<Utc>, length: Duration) -> Result<Self> {
        if length < Duration::zero() {
            return Err(GeneratorError::invalid(
                "window",
                format!("length must not be negative, got {length}"),
            ));
        }
        let start = now.checked_sub_signed(length).ok_or_else(|| {
            GeneratorError::invalid("window", format!("{length} before {now} is out of range"))
        })?;
        Self::new(start, now)
    }

    /// the window covering the last `days` days from the current time of `time`
    pub fn last_days(time: &impl TimeGetter, days: u32) -> Result<Self> {
        Self::trailing(time.now(), Duration::days(i64::from(days)))
    }

    /// the first instant of the window
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// the last instant of the window
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// true if `timestamp` falls inside the window
    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        self.start <= *timestamp && *timestamp <= self.end
    }

    pub(crate) fn millis_range(&self) -> std::ops::RangeInclusive<i64> {
        self.start.timestamp_millis()..=self.end.timestamp_millis()
    }
}
