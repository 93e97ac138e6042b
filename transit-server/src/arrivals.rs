//! Station arrivals, grouped per platform.
//!
//! Built fresh per request from raw live-arrival records, never
//! cached. Output order is deterministic: platforms alphabetical by
//! name, arrivals within a platform ascending by time-to-station.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::clock;
use crate::tfl::types::StationArrival;

/// Vehicle ID the provider uses for unknown/unassigned vehicles.
pub const UNTRACKABLE_VEHICLE_ID: &str = "000";

/// Platform bucket for records with a blank or literal "null" name.
const PLATFORM_NOT_SPECIFIED: &str = "Platform Not Specified";

/// Live arrivals at one station, grouped by platform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arrivals {
    pub station_id: String,
    pub station_name: String,
    pub platforms: Vec<Platform>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Platform {
    pub name: String,
    pub arrivals: Vec<Arrival>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arrival {
    pub vehicle_id: String,
    pub towards: String,
    pub current_location: String,
    pub time_to_station: Duration,
    pub expected_arrival: DateTime<Utc>,
}

impl Arrival {
    /// Whether this arrival's vehicle can be followed; the provider
    /// reports "000" for unknown vehicles.
    pub fn can_be_tracked(&self) -> bool {
        self.vehicle_id != UNTRACKABLE_VEHICLE_ID
    }

    /// Display ETA, e.g. `14:05 (2m30s)`.
    pub fn eta(&self) -> String {
        format!(
            "{} ({})",
            clock::display_clock(self.expected_arrival),
            clock::format_duration(self.time_to_station)
        )
    }
}

/// Group raw arrival records into the per-platform view.
///
/// An empty record set yields the empty `Arrivals` value.
pub fn build_arrivals(records: Vec<StationArrival>) -> Arrivals {
    let Some(first) = records.first() else {
        return Arrivals::default();
    };

    let station_id = first.naptan_id.clone();
    let station_name = first.station_name.clone();

    let mut by_platform: HashMap<String, Vec<Arrival>> = HashMap::new();
    for record in records {
        let platform = cleansed_platform_name(&record.platform_name);
        by_platform.entry(platform).or_default().push(Arrival {
            vehicle_id: record.vehicle_id,
            towards: record.towards,
            current_location: current_location_or_default(record.current_location),
            time_to_station: Duration::from_secs(record.time_to_station.max(0) as u64),
            expected_arrival: clock::parse_rfc3339_lenient(&record.expected_arrival),
        });
    }

    let mut platforms: Vec<Platform> = by_platform
        .into_iter()
        .map(|(name, mut arrivals)| {
            arrivals.sort_by_key(|a| a.time_to_station);
            Platform { name, arrivals }
        })
        .collect();
    platforms.sort_by(|a, b| a.name.cmp(&b.name));

    Arrivals {
        station_id,
        station_name,
        platforms,
    }
}

fn cleansed_platform_name(raw: &str) -> String {
    if raw.is_empty() || raw == "null" {
        PLATFORM_NOT_SPECIFIED.to_string()
    } else {
        raw.to_string()
    }
}

fn current_location_or_default(raw: String) -> String {
    if raw.is_empty() {
        "Not Available".to_string()
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(platform: &str, vehicle: &str, secs: i64) -> StationArrival {
        StationArrival {
            naptan_id: "940GZZLUOXC".into(),
            station_name: "Oxford Circus Underground Station".into(),
            platform_name: platform.into(),
            towards: "Brixton".into(),
            current_location: String::new(),
            vehicle_id: vehicle.into(),
            time_to_station: secs,
            expected_arrival: "2026-08-24T08:15:00Z".into(),
        }
    }

    #[test]
    fn empty_records_give_empty_arrivals() {
        assert_eq!(build_arrivals(Vec::new()), Arrivals::default());
    }

    #[test]
    fn groups_by_platform_and_sorts() {
        let arrivals = build_arrivals(vec![
            record("Southbound - Platform 5", "203", 300),
            record("Northbound - Platform 3", "117", 120),
            record("Southbound - Platform 5", "204", 60),
        ]);

        assert_eq!(arrivals.station_id, "940GZZLUOXC");
        assert_eq!(arrivals.platforms.len(), 2);
        assert_eq!(arrivals.platforms[0].name, "Northbound - Platform 3");
        assert_eq!(arrivals.platforms[1].name, "Southbound - Platform 5");

        let southbound = &arrivals.platforms[1];
        assert_eq!(southbound.arrivals[0].vehicle_id, "204");
        assert_eq!(southbound.arrivals[1].vehicle_id, "203");
    }

    #[test]
    fn blank_and_null_platforms_are_cleansed() {
        let arrivals = build_arrivals(vec![record("", "117", 60), record("null", "118", 90)]);
        assert_eq!(arrivals.platforms.len(), 1);
        assert_eq!(arrivals.platforms[0].name, PLATFORM_NOT_SPECIFIED);
        assert_eq!(arrivals.platforms[0].arrivals.len(), 2);
    }

    #[test]
    fn blank_location_defaults_to_not_available() {
        let arrivals = build_arrivals(vec![record("Platform 1", "117", 60)]);
        assert_eq!(
            arrivals.platforms[0].arrivals[0].current_location,
            "Not Available"
        );
    }

    #[test]
    fn sentinel_vehicle_cannot_be_tracked() {
        let arrivals = build_arrivals(vec![record("Platform 1", "000", 60)]);
        assert!(!arrivals.platforms[0].arrivals[0].can_be_tracked());

        let arrivals = build_arrivals(vec![record("Platform 1", "117", 60)]);
        assert!(arrivals.platforms[0].arrivals[0].can_be_tracked());
    }

    proptest! {
        #[test]
        fn platforms_sorted_and_arrivals_nondecreasing(
            records in prop::collection::vec(
                ("[a-d]", "[0-9]{3}", 0i64..3600).prop_map(|(p, v, t)| record(&p, &v, t)),
                0..40,
            )
        ) {
            let arrivals = build_arrivals(records);
            for pair in arrivals.platforms.windows(2) {
                prop_assert!(pair[0].name < pair[1].name);
            }
            for platform in &arrivals.platforms {
                for pair in platform.arrivals.windows(2) {
                    prop_assert!(pair[0].time_to_station <= pair[1].time_to_station);
                }
            }
        }
    }
}
