//! Per-vehicle schedule built from live arrival records.
//!
//! Raw records are filtered to the requested line, time-sorted and
//! deduplicated so the stop list carries at most one entry per
//! station; on looping services the first chronological pass wins.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::clock;
use crate::tfl::types::VehicleArrival;

/// Upcoming stops for one tracked vehicle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleSchedule {
    pub vehicle_id: String,
    pub line: String,
    pub destination: String,
    pub current_location: String,
    pub stops: Vec<VehicleStop>,
}

impl VehicleSchedule {
    pub fn cleansed_current_location(&self) -> &str {
        if self.current_location.is_empty() {
            "Current Location Not Specified"
        } else {
            &self.current_location
        }
    }

    /// True when the upstream had no records for this vehicle on the
    /// requested line.
    pub fn is_empty(&self) -> bool {
        self.vehicle_id.is_empty() && self.stops.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleStop {
    pub station_id: String,
    pub station_name: String,
    pub time_to_station: Duration,
    pub expected_arrival: DateTime<Utc>,
}

impl VehicleStop {
    /// Display ETA, e.g. `14:05 (2m30s)`.
    pub fn eta(&self) -> String {
        format!(
            "{} ({})",
            self.eta_time(),
            clock::format_duration(self.time_to_station)
        )
    }

    /// Display arrival clock time only.
    pub fn eta_time(&self) -> String {
        clock::display_clock(self.expected_arrival)
    }
}

/// Build the stop-ordered schedule for a vehicle on one line.
///
/// Records for other lines are discarded; when none remain the empty
/// schedule is returned.
pub fn build_vehicle_schedule(
    records: Vec<VehicleArrival>,
    line_id: &str,
    vehicle_id: &str,
) -> VehicleSchedule {
    let records: Vec<VehicleArrival> = records
        .into_iter()
        .filter(|r| r.line_id == line_id)
        .collect();
    let Some(first) = records.first() else {
        return VehicleSchedule::default();
    };

    VehicleSchedule {
        vehicle_id: vehicle_id.to_string(),
        line: first.line_name.clone(),
        destination: destination_of(first),
        current_location: longest_location(&records),
        stops: stops_of(records),
    }
}

/// Destination falls back from the explicit destination name to the
/// "towards" hint, then to "Not Available".
fn destination_of(first: &VehicleArrival) -> String {
    if !first.destination_name.is_empty() {
        first.destination_name.clone()
    } else if !first.towards.is_empty() {
        first.towards.clone()
    } else {
        "Not Available".to_string()
    }
}

/// The longest non-empty location string across the records, assumed
/// the most descriptive. Documented upstream behaviour, not a
/// guaranteed-correct heuristic.
fn longest_location(records: &[VehicleArrival]) -> String {
    let mut result = "";
    for record in records {
        if record.current_location.len() > result.len() {
            result = &record.current_location;
        }
    }
    result.to_string()
}

fn stops_of(records: Vec<VehicleArrival>) -> Vec<VehicleStop> {
    let mut stops: Vec<VehicleStop> = records
        .into_iter()
        .map(|r| VehicleStop {
            station_id: r.naptan_id,
            station_name: r.station_name,
            time_to_station: Duration::from_secs(r.time_to_station.max(0) as u64),
            expected_arrival: clock::parse_rfc3339_lenient(&r.expected_arrival),
        })
        .collect();
    stops.sort_by_key(|s| s.time_to_station);

    // First chronological occurrence per station wins; later passes
    // of a looping route are dropped.
    let mut seen = HashSet::new();
    stops.retain(|s| seen.insert(s.station_id.clone()));
    stops
}
