//! The fetcher seam between cache actors and the remote adapter.

use std::collections::HashMap;
use std::future::Future;

use crate::domain::{Line, Route, Station, Status};
use crate::tfl::TflError;
use crate::tfl::types::{StationArrival, TimetableResponse, VehicleArrival};

/// Remote lookup surface consumed by the cache actors and the query
/// facade.
///
/// [`crate::tfl::TflClient`] is the production implementation; a
/// fixture-backed fetcher in `tfl::mock` stands in under test.
/// Futures are `Send` so implementations can be driven from spawned
/// actor workers.
pub trait TransitFetcher: Send + Sync + 'static {
    /// Lines for a transit mode, sorted ascending by ID.
    fn fetch_lines(&self, mode: &str)
    -> impl Future<Output = Result<Vec<Line>, TflError>> + Send;

    /// Stations served by a line, sorted ascending by name.
    fn fetch_stations(
        &self,
        line_id: &str,
    ) -> impl Future<Output = Result<Vec<Station>, TflError>> + Send;

    /// Ordered directional routes for a line.
    fn fetch_routes(
        &self,
        line_id: &str,
    ) -> impl Future<Output = Result<Vec<Route>, TflError>> + Send;

    /// Current status per line ID for a transit mode.
    fn fetch_status(
        &self,
        mode: &str,
    ) -> impl Future<Output = Result<HashMap<String, Status>, TflError>> + Send;

    /// Raw weekly timetable between two stations on a line.
    fn fetch_timetable(
        &self,
        line_id: &str,
        from_station_id: &str,
        to_station_id: &str,
    ) -> impl Future<Output = Result<TimetableResponse, TflError>> + Send;

    /// Live arrivals at a station. HTTP 400 from upstream means "no
    /// data for this combination" and yields an empty list.
    fn fetch_station_arrivals(
        &self,
        line_id: &str,
        station_id: &str,
    ) -> impl Future<Output = Result<Vec<StationArrival>, TflError>> + Send;

    /// Live arrivals for one vehicle across all its upcoming stops.
    fn fetch_vehicle_arrivals(
        &self,
        vehicle_id: &str,
    ) -> impl Future<Output = Result<Vec<VehicleArrival>, TflError>> + Send;
}
