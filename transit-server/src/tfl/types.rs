//! TfL API response DTOs.
//!
//! These map directly to the unified API's JSON. Field defaults are
//! applied liberally because TfL omits fields rather than sending
//! nulls in many cases.

use serde::Deserialize;

/// One line from `Line/Mode/{mode}/Route`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineSummary {
    pub id: String,
    pub name: String,
}

/// One stop point from `Line/{id}/StopPoints`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StopPoint {
    pub id: String,
    pub common_name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Response from `Line/{id}/Route/Sequence/all`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouteSequence {
    pub ordered_line_routes: Vec<OrderedLineRoute>,
}

/// One directional route: a name plus ordered stop IDs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderedLineRoute {
    pub name: String,
    pub naptan_ids: Vec<String>,
}

/// One line's status from `Line/Mode/{mode}/Status`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineWithStatus {
    pub id: String,
    pub line_statuses: Vec<LineStatusItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineStatusItem {
    pub status_severity_description: String,
    pub reason: String,
}

impl LineWithStatus {
    /// Displayed status text is the reason when present, otherwise
    /// the severity description, deduplicated preserving first-seen
    /// order.
    pub fn status_descriptions(&self) -> Vec<String> {
        let mut result: Vec<String> = Vec::with_capacity(self.line_statuses.len());
        for status in &self.line_statuses {
            let text = if status.reason.is_empty() {
                &status.status_severity_description
            } else {
                &status.reason
            };
            if !result.iter().any(|seen| seen == text) {
                result.push(text.clone());
            }
        }
        result
    }
}

/// Response from `Line/{id}/Timetable/{from}/to/{to}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimetableResponse {
    pub stops: Vec<TimetableStop>,
    pub timetable: TimetableData,
}

/// Stop catalog entry inside a timetable response. Unlike
/// [`StopPoint`] the display name arrives in `name`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimetableStop {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimetableData {
    pub routes: Vec<TimetableRoute>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimetableRoute {
    pub station_intervals: Vec<StationInterval>,
    pub schedules: Vec<Schedule>,
}

/// A named interval: ordered (stop, minutes-from-origin) pairs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StationInterval {
    pub id: String,
    pub intervals: Vec<StopInterval>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StopInterval {
    pub stop_id: String,
    pub time_to_arrival: f64,
}

/// A weekly schedule grouping, e.g. "Monday to Thursday".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Schedule {
    pub name: String,
    pub known_journeys: Vec<KnownJourney>,
}

/// One scheduled trip: departure clock plus the interval describing
/// its stops. Hours may exceed 23 for post-midnight trips belonging
/// to the previous service day.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KnownJourney {
    pub hour: String,
    pub minute: String,
    pub interval_id: i64,
}

/// One record from `Line/{id}/Arrivals/{station}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StationArrival {
    pub naptan_id: String,
    pub station_name: String,
    pub platform_name: String,
    pub towards: String,
    pub current_location: String,
    pub vehicle_id: String,
    /// Seconds until arrival.
    pub time_to_station: i64,
    /// RFC3339 timestamp.
    pub expected_arrival: String,
}

/// One record from `Vehicle/{id}/Arrivals`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VehicleArrival {
    pub vehicle_id: String,
    pub line_id: String,
    pub line_name: String,
    pub destination_name: String,
    pub towards: String,
    pub naptan_id: String,
    pub station_name: String,
    pub current_location: String,
    /// Seconds until arrival.
    pub time_to_station: i64,
    /// RFC3339 timestamp.
    pub expected_arrival: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_reason_wins_over_severity() {
        let status = LineWithStatus {
            id: "district".into(),
            line_statuses: vec![
                LineStatusItem {
                    status_severity_description: "Minor Delays".into(),
                    reason: "District Line: Minor delays due to train cancellations.".into(),
                },
                LineStatusItem {
                    status_severity_description: "Good Service".into(),
                    reason: String::new(),
                },
            ],
        };
        assert_eq!(
            status.status_descriptions(),
            vec![
                "District Line: Minor delays due to train cancellations.".to_string(),
                "Good Service".to_string(),
            ]
        );
    }

    #[test]
    fn status_descriptions_deduplicate_preserving_order() {
        let status = LineWithStatus {
            id: "circle".into(),
            line_statuses: vec![
                LineStatusItem {
                    status_severity_description: "Part Closure".into(),
                    reason: "Planned engineering works.".into(),
                },
                LineStatusItem {
                    status_severity_description: "Severe Delays".into(),
                    reason: "Planned engineering works.".into(),
                },
                LineStatusItem {
                    status_severity_description: "Good Service".into(),
                    reason: String::new(),
                },
            ],
        };
        assert_eq!(
            status.status_descriptions(),
            vec![
                "Planned engineering works.".to_string(),
                "Good Service".to_string()
            ]
        );
    }

    #[test]
    fn timetable_response_parses_with_missing_fields() {
        let json = r#"{
            "stops": [{"id": "940GZZLUBXN", "name": "Brixton Underground Station"}],
            "timetable": {
                "routes": [{
                    "stationIntervals": [{
                        "id": "0",
                        "intervals": [{"stopId": "940GZZLUBXN", "timeToArrival": 3.0}]
                    }],
                    "schedules": [{
                        "name": "Monday to Thursday",
                        "knownJourneys": [{"hour": "5", "minute": "10", "intervalId": 0}]
                    }]
                }]
            }
        }"#;
        let parsed: TimetableResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.stops.len(), 1);
        let route = &parsed.timetable.routes[0];
        assert_eq!(route.station_intervals[0].id, "0");
        assert_eq!(route.schedules[0].known_journeys[0].hour, "5");
        assert_eq!(route.schedules[0].known_journeys[0].interval_id, 0);
    }

    #[test]
    fn station_arrival_defaults_absent_fields() {
        let json = r#"[{"naptanId": "940GZZLUOXC", "timeToStation": 120}]"#;
        let parsed: Vec<StationArrival> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed[0].naptan_id, "940GZZLUOXC");
        assert_eq!(parsed[0].time_to_station, 120);
        assert_eq!(parsed[0].platform_name, "");
        assert_eq!(parsed[0].vehicle_id, "");
    }
}
