//! Display timezone conversion and lenient timestamp parsing.
//!
//! All absolute timestamps are shown in the network's local timezone
//! (Europe/London) regardless of server locale.

use chrono::{DateTime, Utc};
use chrono_tz::Europe::London;
use chrono_tz::Tz;
use tracing::warn;

/// The fixed display timezone.
pub const DISPLAY_TZ: Tz = London;

/// Convert a UTC timestamp into the display timezone.
pub fn to_display(t: DateTime<Utc>) -> DateTime<Tz> {
    t.with_timezone(&DISPLAY_TZ)
}

/// Format a UTC timestamp as `HH:MM` in the display timezone.
pub fn display_clock(t: DateTime<Utc>) -> String {
    to_display(t).format("%H:%M").to_string()
}

/// Parse an RFC3339 timestamp, degrading to the epoch on failure.
///
/// One malformed record must not fail a whole arrivals listing, so a
/// parse failure is logged and treated as a zero time instead of
/// being propagated.
pub fn parse_rfc3339_lenient(raw: &str) -> DateTime<Utc> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(t) => t.with_timezone(&Utc),
        Err(e) => {
            warn!(raw, error = %e, "unable to parse timestamp");
            DateTime::UNIX_EPOCH
        }
    }
}

/// Format a duration the way departure boards read, e.g. `5m30s`.
pub fn format_duration(d: std::time::Duration) -> String {
    let total = d.as_secs();
    let (hours, mins, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}h{mins}m{secs}s")
    } else if mins > 0 {
        format!("{mins}m{secs}s")
    } else {
        format!("{secs}s")
    }
}
