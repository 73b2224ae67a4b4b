//! Time-related utilities with clock abstraction for testability.

use chrono::{DateTime, FixedOffset, Local, SecondsFormat, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get the current instant in UTC
    fn now(&self) -> DateTime<Utc>;

    /// Get the current instant as an ISO-8601 string (`2024-01-01T09:30:00.000Z`)
    fn now_iso8601(&self) -> String {
        to_iso8601(self.now())
    }
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: DateTime<Utc>,
}

impl FixedClock {
    /// Create a new fixed clock with the given instant
    pub fn new(fixed_time: DateTime<Utc>) -> Self {
        Self { fixed_time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.fixed_time
    }
}

/// Render an instant the way message timestamps travel on the wire:
/// UTC, millisecond precision, `Z` suffix.
pub fn to_iso8601(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Format an ISO-8601 timestamp as `HH:MM` in the local time zone.
///
/// Returns `None` when the timestamp cannot be parsed.
pub fn format_clock_time(timestamp: &str) -> Option<String> {
    let parsed = DateTime::parse_from_rfc3339(timestamp).ok()?;
    Some(parsed.with_timezone(&Local).format("%H:%M").to_string())
}

/// Format an ISO-8601 timestamp as `HH:MM` at the given UTC offset.
pub fn format_clock_time_at(timestamp: &str, offset: &FixedOffset) -> Option<String> {
    let parsed = DateTime::parse_from_rfc3339(timestamp).ok()?;
    Some(parsed.with_timezone(offset).format("%H:%M").to_string())
}
