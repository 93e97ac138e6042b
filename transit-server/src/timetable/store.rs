//! Weekly timetable construction and lookup.
//!
//! The upstream timetable arrives as one route carrying named weekly
//! schedules ("Monday to Thursday", "Friday", ...) whose journeys
//! reference shared station intervals. Construction resolves every
//! interval once, then files each schedule into a weekday bucket by
//! substring match on its name. Missing buckets borrow the
//! Monday-to-Thursday schedule, or failing that the last schedule
//! processed, so every weekday always answers with something.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use tracing::warn;

use crate::domain::Station;
use crate::tfl::types::{Schedule, TimetableResponse};
use crate::vehicle::VehicleSchedule;

use super::error::TimetableError;
use super::resolve::{calculate_eta, resolve_stops};
use super::types::{DepartureTime, ScheduledDepartureTimes, ScheduledTimeTable};

/// One stop of a scheduled journey: the station and its offset from
/// departure.
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyStop {
    pub station: Station,
    pub time_to_arrival: Duration,
}

/// The ordered stops of one scheduled trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Journey {
    pub stops: Vec<JourneyStop>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DepartureKey {
    hour: String,
    minute: String,
}

/// One weekday bucket's schedule: the departure board plus a journey
/// per departure time.
#[derive(Debug, Clone, Default)]
pub struct TimetableDetails {
    pub schedule_name: String,
    pub scheduled_departures: Vec<DepartureTime>,
    journeys: HashMap<DepartureKey, Arc<Journey>>,
}

impl TimetableDetails {
    fn is_unset(&self) -> bool {
        self.schedule_name.is_empty() && self.journeys.is_empty()
    }
}

/// A line's weekly timetable between two stations, bucketed by
/// weekday and stamped with its build date.
#[derive(Debug, Clone)]
pub struct TimetableByDayOfWeek {
    stops: HashMap<String, Station>,
    mon_to_thu: TimetableDetails,
    fri: TimetableDetails,
    sat_and_others: TimetableDetails,
    sun: TimetableDetails,
    created_on: NaiveDate,
}

impl TimetableByDayOfWeek {
    /// Entries serve only the calendar day they were built on.
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        self.created_on != today
    }

    pub fn details_for(&self, weekday: Weekday) -> &TimetableDetails {
        match weekday {
            Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu => &self.mon_to_thu,
            Weekday::Fri => &self.fri,
            Weekday::Sat => &self.sat_and_others,
            Weekday::Sun => &self.sun,
        }
    }

    /// The departure board between the two stations for one weekday.
    pub fn departure_times(&self, from: &str, to: &str, weekday: Weekday) -> ScheduledDepartureTimes {
        ScheduledDepartureTimes {
            from: self.stops.get(from).cloned().unwrap_or_default(),
            to: self.stops.get(to).cloned().unwrap_or_default(),
            departure_times: self.details_for(weekday).scheduled_departures.clone(),
        }
    }

    /// The resolved stop list for one departure, overlaid with live
    /// vehicle data when available.
    #[allow(clippy::too_many_arguments)]
    pub fn scheduled_timetable(
        &self,
        from: &str,
        to: &str,
        weekday: Weekday,
        hour: &str,
        minute: &str,
        vehicle: Option<&VehicleSchedule>,
        now: DateTime<Utc>,
    ) -> Result<ScheduledTimeTable, TimetableError> {
        let details = self.details_for(weekday);
        let mut departure = DepartureTime::new(hour, minute);
        let key = DepartureKey {
            hour: hour.to_string(),
            minute: minute.to_string(),
        };
        let journey = details
            .journeys
            .get(&key)
            .ok_or_else(|| TimetableError::NoJourney {
                departure: departure.etd(),
            })?;
        if let Some(last) = journey.stops.last() {
            departure.destination = last.station.clone();
            departure.destination_eta = calculate_eta(&departure, last.time_to_arrival);
        }
        let stops = resolve_stops(journey, &departure, vehicle, now);
        Ok(ScheduledTimeTable {
            from: self.stops.get(from).cloned().unwrap_or_default(),
            to: self.stops.get(to).cloned().unwrap_or_default(),
            departure_time: departure,
            stops,
            vehicle_id: vehicle.map(|v| v.vehicle_id.clone()),
            vehicle_location: vehicle.map(|v| v.cleansed_current_location().to_string()),
        })
    }
}

/// Parse an upstream timetable response into weekday buckets.
pub fn build_timetable(
    wire: &TimetableResponse,
    line: &str,
    from: &str,
    to: &str,
    today: NaiveDate,
) -> Result<TimetableByDayOfWeek, TimetableError> {
    let stops: HashMap<String, Station> = wire
        .stops
        .iter()
        .map(|s| {
            (
                s.id.clone(),
                Station {
                    id: s.id.clone(),
                    name: s.name.clone(),
                    ..Station::default()
                },
            )
        })
        .collect();

    let routes = &wire.timetable.routes;
    let Some(route) = routes.first() else {
        return Err(TimetableError::NoRoutes {
            line: line.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        });
    };
    if routes.len() > 1 {
        warn!(line, from, to, count = routes.len(), "multiple routes in timetable, using the first");
    }
    if route.schedules.is_empty() {
        return Err(TimetableError::NoSchedules {
            line: line.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    let mut journeys_by_interval: HashMap<String, Arc<Journey>> = HashMap::new();
    for interval in &route.station_intervals {
        let mut journey_stops = Vec::with_capacity(interval.intervals.len());
        for stop in &interval.intervals {
            let station =
                stops
                    .get(&stop.stop_id)
                    .cloned()
                    .ok_or_else(|| TimetableError::UnknownStop {
                        stop: stop.stop_id.clone(),
                        line: line.to_string(),
                        from: from.to_string(),
                        to: to.to_string(),
                    })?;
            journey_stops.push(JourneyStop {
                station,
                time_to_arrival: Duration::from_secs((stop.time_to_arrival * 60.0) as u64),
            });
        }
        journeys_by_interval.insert(interval.id.clone(), Arc::new(Journey { stops: journey_stops }));
    }

    let mut result = TimetableByDayOfWeek {
        stops,
        mon_to_thu: TimetableDetails::default(),
        fri: TimetableDetails::default(),
        sat_and_others: TimetableDetails::default(),
        sun: TimetableDetails::default(),
        created_on: today,
    };
    let mut last_processed = TimetableDetails::default();
    for schedule in &route.schedules {
        let details = build_details(schedule, &journeys_by_interval, line, from, to)?;
        last_processed = details.clone();
        let name = schedule.name.to_lowercase();
        if name.contains("friday") {
            result.fri = details;
        } else if name.contains("sunday") {
            result.sun = details;
        } else if name.contains("monday") {
            result.mon_to_thu = details;
        } else {
            result.sat_and_others = details;
        }
    }

    // Missing buckets borrow the Monday-Thursday schedule when it
    // exists, otherwise the last schedule processed.
    let fallback = if result.mon_to_thu.is_unset() {
        warn!(line, from, to, "no Monday-Thursday schedule in timetable");
        result.mon_to_thu = last_processed.clone();
        last_processed
    } else {
        result.mon_to_thu.clone()
    };
    if result.fri.is_unset() {
        warn!(line, from, to, "no Friday schedule in timetable");
        result.fri = fallback.clone();
    }
    if result.sun.is_unset() {
        warn!(line, from, to, "no Sunday schedule in timetable");
        result.sun = fallback.clone();
    }
    if result.sat_and_others.is_unset() {
        warn!(line, from, to, "no Saturday schedule in timetable");
        result.sat_and_others = fallback;
    }

    Ok(result)
}

fn build_details(
    schedule: &Schedule,
    journeys_by_interval: &HashMap<String, Arc<Journey>>,
    line: &str,
    from: &str,
    to: &str,
) -> Result<TimetableDetails, TimetableError> {
    let mut scheduled_departures = Vec::with_capacity(schedule.known_journeys.len());
    let mut journeys = HashMap::with_capacity(schedule.known_journeys.len());
    for known in &schedule.known_journeys {
        let interval_id = known.interval_id.to_string();
        let journey = journeys_by_interval.get(&interval_id).ok_or_else(|| {
            TimetableError::UnknownInterval {
                interval: interval_id.clone(),
                line: line.to_string(),
                from: from.to_string(),
                to: to.to_string(),
            }
        })?;
        let Some(last) = journey.stops.last() else {
            warn!(
                line,
                from,
                to,
                interval = %interval_id,
                hour = %known.hour,
                minute = %known.minute,
                "journey has no stops, skipping departure"
            );
            continue;
        };
        let mut departure = DepartureTime::new(&known.hour, &known.minute);
        departure.destination = last.station.clone();
        departure.destination_eta = calculate_eta(&departure, last.time_to_arrival);
        journeys.insert(
            DepartureKey {
                hour: departure.hour.clone(),
                minute: departure.minute.clone(),
            },
            Arc::clone(journey),
        );
        scheduled_departures.push(departure);
    }
    Ok(TimetableDetails {
        schedule_name: schedule.name.clone(),
        scheduled_departures,
        journeys,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tfl::types::{
        KnownJourney, StationInterval, StopInterval, TimetableData, TimetableRoute, TimetableStop,
    };

    fn wire_stop(id: &str, name: &str) -> TimetableStop {
        TimetableStop {
            id: id.into(),
            name: name.into(),
        }
    }

    fn interval(id: &str, stops: &[(&str, f64)]) -> StationInterval {
        StationInterval {
            id: id.into(),
            intervals: stops
                .iter()
                .map(|(stop_id, mins)| StopInterval {
                    stop_id: (*stop_id).into(),
                    time_to_arrival: *mins,
                })
                .collect(),
        }
    }

    fn schedule(name: &str, journeys: &[(&str, &str, i64)]) -> Schedule {
        Schedule {
            name: name.into(),
            known_journeys: journeys
                .iter()
                .map(|(hour, minute, interval_id)| KnownJourney {
                    hour: (*hour).into(),
                    minute: (*minute).into(),
                    interval_id: *interval_id,
                })
                .collect(),
        }
    }

    fn wire(schedules: Vec<Schedule>) -> TimetableResponse {
        TimetableResponse {
            stops: vec![
                wire_stop("940GZZLUBXN", "Brixton Underground Station"),
                wire_stop("940GZZLUVIC", "Victoria Underground Station"),
            ],
            timetable: TimetableData {
                routes: vec![TimetableRoute {
                    station_intervals: vec![interval(
                        "0",
                        &[("940GZZLUVIC", 9.0)],
                    )],
                    schedules,
                }],
            },
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 12).unwrap()
    }

    #[test]
    fn schedules_land_in_their_weekday_buckets() {
        let wire = wire(vec![
            schedule("Monday to Thursday", &[("5", "10", 0)]),
            schedule("Friday", &[("6", "10", 0)]),
            schedule("Saturday", &[("7", "10", 0)]),
            schedule("Sunday", &[("8", "10", 0)]),
        ]);
        let table = build_timetable(&wire, "victoria", "940GZZLUBXN", "940GZZLUVIC", today())
            .unwrap();

        assert_eq!(table.details_for(Weekday::Wed).scheduled_departures[0].hour, "5");
        assert_eq!(table.details_for(Weekday::Fri).scheduled_departures[0].hour, "6");
        assert_eq!(table.details_for(Weekday::Sat).scheduled_departures[0].hour, "7");
        assert_eq!(table.details_for(Weekday::Sun).scheduled_departures[0].hour, "8");
    }

    #[test]
    fn missing_buckets_borrow_monday_to_thursday() {
        let wire = wire(vec![schedule("Monday to Thursday", &[("5", "10", 0)])]);
        let table = build_timetable(&wire, "victoria", "940GZZLUBXN", "940GZZLUVIC", today())
            .unwrap();

        for weekday in [Weekday::Fri, Weekday::Sat, Weekday::Sun] {
            let details = table.details_for(weekday);
            assert_eq!(details.schedule_name, "Monday to Thursday");
            assert_eq!(details.scheduled_departures[0].hour, "5");
        }
    }

    #[test]
    fn last_schedule_processed_backfills_missing_monday_to_thursday() {
        let wire = wire(vec![
            schedule("Friday", &[("6", "10", 0)]),
            schedule("Sunday", &[("8", "10", 0)]),
        ]);
        let table = build_timetable(&wire, "victoria", "940GZZLUBXN", "940GZZLUVIC", today())
            .unwrap();

        // The Sunday schedule was processed last, so it stands in for
        // both missing buckets.
        assert_eq!(table.details_for(Weekday::Mon).schedule_name, "Sunday");
        assert_eq!(table.details_for(Weekday::Sat).schedule_name, "Sunday");
        assert_eq!(table.details_for(Weekday::Fri).schedule_name, "Friday");
    }

    #[test]
    fn departure_board_carries_destination_and_eta() {
        let wire = wire(vec![schedule("Monday to Thursday", &[("23", "55", 0)])]);
        let table = build_timetable(&wire, "victoria", "940GZZLUBXN", "940GZZLUVIC", today())
            .unwrap();
        let board = table.departure_times("940GZZLUBXN", "940GZZLUVIC", Weekday::Mon);

        assert_eq!(board.from.name, "Brixton Underground Station");
        assert_eq!(board.to.name, "Victoria Underground Station");
        let departure = &board.departure_times[0];
        assert_eq!(departure.destination.id, "940GZZLUVIC");
        // 23:55 + 9 minutes wraps past midnight.
        assert_eq!(departure.destination_eta, "00:04");
    }

    #[test]
    fn scheduled_timetable_resolves_the_matching_journey() {
        let wire = wire(vec![schedule("Monday to Thursday", &[("5", "10", 0)])]);
        let table = build_timetable(&wire, "victoria", "940GZZLUBXN", "940GZZLUVIC", today())
            .unwrap();
        let now = crate::clock::parse_rfc3339_lenient("2026-01-12T05:00:00Z");
        let resolved = table
            .scheduled_timetable("940GZZLUBXN", "940GZZLUVIC", Weekday::Mon, "5", "10", None, now)
            .unwrap();

        assert_eq!(resolved.stops.len(), 1);
        assert_eq!(resolved.stops[0].eta, "05:19");
        assert_eq!(resolved.departure_time.destination.id, "940GZZLUVIC");
        assert!(resolved.vehicle_id.is_none());
    }

    #[test]
    fn unknown_departure_is_reported_with_wrapped_clock() {
        let wire = wire(vec![schedule("Monday to Thursday", &[("5", "10", 0)])]);
        let table = build_timetable(&wire, "victoria", "940GZZLUBXN", "940GZZLUVIC", today())
            .unwrap();
        let now = crate::clock::parse_rfc3339_lenient("2026-01-12T05:00:00Z");
        let err = table
            .scheduled_timetable("940GZZLUBXN", "940GZZLUVIC", Weekday::Mon, "25", "30", None, now)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "no journey found for departure time: 01:30"
        );
    }

    #[test]
    fn unknown_stop_in_interval_fails_the_build() {
        let mut wire = wire(vec![schedule("Monday to Thursday", &[("5", "10", 0)])]);
        wire.timetable.routes[0].station_intervals =
            vec![interval("0", &[("940GZZLUXXX", 5.0)])];
        let err = build_timetable(&wire, "victoria", "940GZZLUBXN", "940GZZLUVIC", today())
            .unwrap_err();
        assert!(matches!(err, TimetableError::UnknownStop { .. }));
    }

    #[test]
    fn unknown_interval_reference_fails_the_build() {
        let wire = wire(vec![schedule("Monday to Thursday", &[("5", "10", 7)])]);
        let err = build_timetable(&wire, "victoria", "940GZZLUBXN", "940GZZLUVIC", today())
            .unwrap_err();
        assert!(matches!(err, TimetableError::UnknownInterval { .. }));
    }

    #[test]
    fn empty_route_and_schedule_lists_are_errors() {
        let mut no_routes = wire(vec![]);
        no_routes.timetable.routes.clear();
        assert!(matches!(
            build_timetable(&no_routes, "victoria", "A", "B", today()).unwrap_err(),
            TimetableError::NoRoutes { .. }
        ));

        let no_schedules = wire(vec![]);
        assert!(matches!(
            build_timetable(&no_schedules, "victoria", "A", "B", today()).unwrap_err(),
            TimetableError::NoSchedules { .. }
        ));
    }

    #[test]
    fn entries_are_stale_from_the_next_day() {
        let wire = wire(vec![schedule("Monday to Thursday", &[("5", "10", 0)])]);
        let table = build_timetable(&wire, "victoria", "940GZZLUBXN", "940GZZLUVIC", today())
            .unwrap();

        assert!(!table.is_stale(today()));
        assert!(table.is_stale(NaiveDate::from_ymd_opt(2026, 1, 13).unwrap()));
    }
}
