//! Pure journey resolution: static schedule plus live overlay.
//!
//! Given a journey's stop intervals, a departure time and optionally
//! the live schedule of the vehicle running it, produce the resolved
//! stop list. With no vehicle every stop is static; with one, live
//! ETAs are matched by station and each stop is flagged on time or
//! delayed. A stop whose static ETA is more than two minutes in the
//! past with no live record is taken as already served and omitted.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::clock;
use crate::vehicle::VehicleSchedule;

use super::store::Journey;
use super::types::{DepartureTime, JourneyStatus, ScheduledStop, clock_minutes};

/// How far a live ETA may slip past the static one before the stop
/// counts as delayed, and how far past a static ETA we keep showing
/// a stop with no live data.
const SLACK: chrono::Duration = chrono::Duration::minutes(2);

/// Clock ETA at a stop `time_to_arrival` after `departure`, wrapped
/// on the 24-hour dial.
pub fn calculate_eta(departure: &DepartureTime, time_to_arrival: Duration) -> String {
    let minutes = eta_minutes(departure, time_to_arrival);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn eta_minutes(departure: &DepartureTime, time_to_arrival: Duration) -> i64 {
    (clock_minutes(&departure.hour, &departure.minute) + time_to_arrival.as_secs() as i64 / 60)
        % (24 * 60)
}

/// Resolve a journey's stops against an optional live vehicle
/// schedule, as of `now`.
pub fn resolve_stops(
    journey: &Journey,
    departure: &DepartureTime,
    vehicle: Option<&VehicleSchedule>,
    now: DateTime<Utc>,
) -> Vec<ScheduledStop> {
    let Some(vehicle) = vehicle else {
        return journey
            .stops
            .iter()
            .map(|stop| ScheduledStop {
                station: stop.station.clone(),
                time_to_arrival: stop.time_to_arrival,
                eta: calculate_eta(departure, stop.time_to_arrival),
                journey_eta: "NA".to_string(),
                status: JourneyStatus::NotAvailable,
            })
            .collect();
    };

    let mut live: HashMap<&str, DateTime<Utc>> = HashMap::new();
    for stop in &vehicle.stops {
        live.entry(stop.station_id.as_str())
            .or_insert(stop.expected_arrival);
    }

    let cutoff = now - SLACK;
    let today = clock::to_display(now).date_naive();
    let mut resolved = Vec::with_capacity(journey.stops.len());
    for stop in &journey.stops {
        let minutes = eta_minutes(departure, stop.time_to_arrival);
        let static_eta = local_clock_to_utc(today, minutes, now);
        match live.get(stop.station.id.as_str()) {
            Some(&live_eta) => {
                let status = if live_eta > static_eta + SLACK {
                    JourneyStatus::Delayed
                } else {
                    JourneyStatus::OnTime
                };
                resolved.push(ScheduledStop {
                    station: stop.station.clone(),
                    time_to_arrival: stop.time_to_arrival,
                    eta: calculate_eta(departure, stop.time_to_arrival),
                    journey_eta: clock::display_clock(live_eta),
                    status,
                });
            }
            None if static_eta < cutoff => {
                // No live record and the scheduled time is behind us:
                // the vehicle has already served this stop.
            }
            None => resolved.push(ScheduledStop {
                station: stop.station.clone(),
                time_to_arrival: stop.time_to_arrival,
                eta: calculate_eta(departure, stop.time_to_arrival),
                journey_eta: "NA".to_string(),
                status: JourneyStatus::NotAvailable,
            }),
        }
    }
    resolved
}

/// Anchor a wall-clock minute count to the display timezone and
/// convert to UTC.
///
/// A bare `HH:MM` is ambiguous around midnight: a schedule hour of
/// "24" queried at 23:59 means a few minutes ahead, not a day ago.
/// Each of yesterday, `today` and tomorrow is tried and the
/// candidate instant nearest `now` wins. Nonexistent local times
/// (DST gaps) fall back to `now`.
fn local_clock_to_utc(today: NaiveDate, minutes: i64, now: DateTime<Utc>) -> DateTime<Utc> {
    let Some(time) = NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0)
    else {
        return now;
    };
    let mut nearest: Option<DateTime<Utc>> = None;
    for offset in [-1, 0, 1] {
        let Some(date) = today.checked_add_signed(chrono::Duration::days(offset)) else {
            continue;
        };
        let Some(local) = clock::DISPLAY_TZ
            .from_local_datetime(&date.and_time(time))
            .earliest()
        else {
            continue;
        };
        let candidate = local.with_timezone(&Utc);
        let closer = match nearest {
            None => true,
            Some(best) => (candidate - now).abs() < (best - now).abs(),
        };
        if closer {
            nearest = Some(candidate);
        }
    }
    nearest.unwrap_or(now)
}
