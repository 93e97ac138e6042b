//! Query result types for timetable lookups.

use std::fmt;
use std::time::Duration;

use tracing::warn;

use crate::domain::Station;

/// One scheduled departure from the origin station.
///
/// Hour and minute are kept as the upstream strings: hours run past
/// 23 for post-midnight trips belonging to the previous service day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepartureTime {
    pub hour: String,
    pub minute: String,
    pub destination: Station,
    pub destination_eta: String,
}

impl DepartureTime {
    pub fn new(hour: &str, minute: &str) -> Self {
        Self {
            hour: hour.to_string(),
            minute: minute.to_string(),
            ..Self::default()
        }
    }

    /// Effective departure clock, with post-midnight hours wrapped
    /// onto the 24-hour dial, e.g. hour "25" minute "10" reads
    /// `01:10`.
    pub fn etd(&self) -> String {
        let minutes = clock_minutes(&self.hour, &self.minute);
        format!("{:02}:{:02}", minutes / 60, minutes % 60)
    }
}

/// Minutes past midnight on the 24-hour dial for an upstream
/// hour/minute pair. Unparseable components read as zero.
pub(crate) fn clock_minutes(hour: &str, minute: &str) -> i64 {
    let hour = match hour.parse::<i64>() {
        Ok(h) => h,
        Err(e) => {
            warn!(hour, error = %e, "unable to parse departure hour");
            0
        }
    };
    let minute = match minute.parse::<i64>() {
        Ok(m) => m,
        Err(e) => {
            warn!(minute, error = %e, "unable to parse departure minute");
            0
        }
    };
    ((hour % 24) * 60 + minute).rem_euclid(24 * 60)
}

/// All scheduled departures between two stations on one weekday
/// bucket.
#[derive(Debug, Clone, Default)]
pub struct ScheduledDepartureTimes {
    pub from: Station,
    pub to: Station,
    pub departure_times: Vec<DepartureTime>,
}

/// The full stop-by-stop view of one scheduled journey, optionally
/// overlaid with live vehicle data.
#[derive(Debug, Clone, Default)]
pub struct ScheduledTimeTable {
    pub from: Station,
    pub to: Station,
    pub departure_time: DepartureTime,
    pub stops: Vec<ScheduledStop>,
    pub vehicle_id: Option<String>,
    pub vehicle_location: Option<String>,
}

/// One stop of a resolved journey.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledStop {
    pub station: Station,
    pub time_to_arrival: Duration,
    /// Static ETA from the schedule, `HH:MM`.
    pub eta: String,
    /// Live ETA from the tracked vehicle, or `NA`.
    pub journey_eta: String,
    pub status: JourneyStatus,
}

/// Live status of a scheduled stop relative to its static ETA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JourneyStatus {
    NotAvailable,
    OnTime,
    Delayed,
}

impl JourneyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JourneyStatus::NotAvailable => "journeyNA",
            JourneyStatus::OnTime => "journeyOK",
            JourneyStatus::Delayed => "journeyDelayed",
        }
    }
}

impl fmt::Display for JourneyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
