//! JSON response shapes for the HTTP API.
//!
//! Domain types carry raw values (durations, UTC timestamps); the
//! DTOs add the display strings (local clock ETAs, wrapped departure
//! clocks) so clients do not have to re-derive them.

use serde::Serialize;

use crate::arrivals::{Arrival, Arrivals, Platform};
use crate::domain::{Line, Route, Station};
use crate::timetable::{
    DepartureTime, ScheduledDepartureTimes, ScheduledStop, ScheduledTimeTable,
};
use crate::vehicle::{VehicleSchedule, VehicleStop};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDto {
    pub id: String,
    pub name: String,
    pub status: Vec<String>,
}

impl LineDto {
    pub fn from_line(line: &Line) -> Self {
        Self {
            id: line.id.clone(),
            name: line.name.clone(),
            status: line.status.descriptions.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDto {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub lat: f64,
    pub lon: f64,
}

impl StationDto {
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id.clone(),
            name: station.name.clone(),
            short_name: station.short_name(),
            lat: station.lat,
            lon: station.lon,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDto {
    pub id: String,
    pub name: String,
    pub start: String,
    pub dest: String,
    pub stations: Vec<StationDto>,
}

impl RouteDto {
    pub fn from_route(route: &Route) -> Self {
        Self {
            id: route.id.clone(),
            name: route.name.clone(),
            start: route.start().to_string(),
            dest: route.dest().to_string(),
            stations: route.stations.iter().map(StationDto::from_station).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalsDto {
    pub station_id: String,
    pub station_name: String,
    pub platforms: Vec<PlatformDto>,
}

impl ArrivalsDto {
    pub fn from_arrivals(arrivals: &Arrivals) -> Self {
        Self {
            station_id: arrivals.station_id.clone(),
            station_name: arrivals.station_name.clone(),
            platforms: arrivals
                .platforms
                .iter()
                .map(PlatformDto::from_platform)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformDto {
    pub name: String,
    pub arrivals: Vec<ArrivalDto>,
}

impl PlatformDto {
    fn from_platform(platform: &Platform) -> Self {
        Self {
            name: platform.name.clone(),
            arrivals: platform.arrivals.iter().map(ArrivalDto::from_arrival).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalDto {
    pub vehicle_id: String,
    pub towards: String,
    pub current_location: String,
    pub eta: String,
    pub trackable: bool,
}

impl ArrivalDto {
    fn from_arrival(arrival: &Arrival) -> Self {
        Self {
            vehicle_id: arrival.vehicle_id.clone(),
            towards: arrival.towards.clone(),
            current_location: arrival.current_location.clone(),
            eta: arrival.eta(),
            trackable: arrival.can_be_tracked(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleScheduleDto {
    pub vehicle_id: String,
    pub line: String,
    pub destination: String,
    pub current_location: String,
    pub stops: Vec<VehicleStopDto>,
}

impl VehicleScheduleDto {
    pub fn from_schedule(schedule: &VehicleSchedule) -> Self {
        Self {
            vehicle_id: schedule.vehicle_id.clone(),
            line: schedule.line.clone(),
            destination: schedule.destination.clone(),
            current_location: schedule.cleansed_current_location().to_string(),
            stops: schedule.stops.iter().map(VehicleStopDto::from_stop).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleStopDto {
    pub station_id: String,
    pub station_name: String,
    pub eta: String,
}

impl VehicleStopDto {
    fn from_stop(stop: &VehicleStop) -> Self {
        Self {
            station_id: stop.station_id.clone(),
            station_name: stop.station_name.clone(),
            eta: stop.eta(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureTimeDto {
    pub hour: String,
    pub minute: String,
    /// Departure clock wrapped onto the 24-hour dial.
    pub etd: String,
    pub destination: StationDto,
    pub destination_eta: String,
}

impl DepartureTimeDto {
    fn from_departure(departure: &DepartureTime) -> Self {
        Self {
            hour: departure.hour.clone(),
            minute: departure.minute.clone(),
            etd: departure.etd(),
            destination: StationDto::from_station(&departure.destination),
            destination_eta: departure.destination_eta.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureBoardDto {
    pub from: StationDto,
    pub to: StationDto,
    pub departure_times: Vec<DepartureTimeDto>,
}

impl DepartureBoardDto {
    pub fn from_board(board: &ScheduledDepartureTimes) -> Self {
        Self {
            from: StationDto::from_station(&board.from),
            to: StationDto::from_station(&board.to),
            departure_times: board
                .departure_times
                .iter()
                .map(DepartureTimeDto::from_departure)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTimetableDto {
    pub from: StationDto,
    pub to: StationDto,
    pub departure: DepartureTimeDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_location: Option<String>,
    pub stops: Vec<ScheduledStopDto>,
}

impl ScheduledTimetableDto {
    pub fn from_timetable(timetable: &ScheduledTimeTable) -> Self {
        Self {
            from: StationDto::from_station(&timetable.from),
            to: StationDto::from_station(&timetable.to),
            departure: DepartureTimeDto::from_departure(&timetable.departure_time),
            vehicle_id: timetable.vehicle_id.clone(),
            vehicle_location: timetable.vehicle_location.clone(),
            stops: timetable.stops.iter().map(ScheduledStopDto::from_stop).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledStopDto {
    pub station: StationDto,
    pub eta: String,
    pub journey_eta: String,
    pub status: String,
}

impl ScheduledStopDto {
    fn from_stop(stop: &ScheduledStop) -> Self {
        Self {
            station: StationDto::from_station(&stop.station),
            eta: stop.eta.clone(),
            journey_eta: stop.journey_eta.clone(),
            status: stop.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::JourneyStatus;
    use std::time::Duration;

    #[test]
    fn station_dto_carries_the_short_name() {
        let dto = StationDto::from_station(&Station {
            id: "940GZZLUVIC".into(),
            name: "Victoria Underground Station".into(),
            lat: 51.49,
            lon: -0.14,
        });
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["shortName"], "Victoria");
        assert_eq!(json["name"], "Victoria Underground Station");
    }

    #[test]
    fn scheduled_stop_serializes_status_name() {
        let dto = ScheduledStopDto::from_stop(&ScheduledStop {
            station: Station::default(),
            time_to_arrival: Duration::from_secs(300),
            eta: "08:05".into(),
            journey_eta: "08:08".into(),
            status: JourneyStatus::Delayed,
        });
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["status"], "journeyDelayed");
        assert_eq!(json["journeyEta"], "08:08");
    }

    #[test]
    fn absent_vehicle_fields_are_omitted() {
        let dto = ScheduledTimetableDto::from_timetable(&ScheduledTimeTable::default());
        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("vehicleId").is_none());
        assert!(json.get("vehicleLocation").is_none());
    }
}
