//! Mock fetcher for exercising the actors without API access.
//!
//! Serves fixtures from memory and counts remote calls per resource,
//! which lets tests assert memoization (a cached lookup must not
//! trigger another fetch) and the no-negative-caching rule.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::{Line, Route, Station, Status};
use crate::fetch::TransitFetcher;

use super::error::TflError;
use super::types::{StationArrival, TimetableResponse, VehicleArrival};

/// Per-resource remote call counters.
#[derive(Debug, Default)]
pub struct CallCounts {
    pub lines: AtomicUsize,
    pub stations: AtomicUsize,
    pub routes: AtomicUsize,
    pub status: AtomicUsize,
    pub timetable: AtomicUsize,
    pub station_arrivals: AtomicUsize,
    pub vehicle_arrivals: AtomicUsize,
}

/// In-memory [`TransitFetcher`] backed by fixtures.
#[derive(Debug, Default)]
pub struct MockFetcher {
    lines: HashMap<String, Vec<Line>>,
    stations: HashMap<String, Vec<Station>>,
    routes: HashMap<String, Vec<Route>>,
    statuses: HashMap<String, HashMap<String, Status>>,
    timetables: HashMap<(String, String, String), TimetableResponse>,
    station_arrivals: HashMap<(String, String), Vec<StationArrival>>,
    vehicle_arrivals: HashMap<String, Vec<VehicleArrival>>,
    fail_remaining: AtomicUsize,
    /// Remote calls per resource kind.
    pub calls: CallCounts,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lines(mut self, mode: &str, lines: Vec<Line>) -> Self {
        self.lines.insert(mode.to_string(), lines);
        self
    }

    pub fn with_stations(mut self, line_id: &str, stations: Vec<Station>) -> Self {
        self.stations.insert(line_id.to_string(), stations);
        self
    }

    pub fn with_routes(mut self, line_id: &str, routes: Vec<Route>) -> Self {
        self.routes.insert(line_id.to_string(), routes);
        self
    }

    pub fn with_status(mut self, mode: &str, statuses: HashMap<String, Status>) -> Self {
        self.statuses.insert(mode.to_string(), statuses);
        self
    }

    pub fn with_timetable(
        mut self,
        line_id: &str,
        from: &str,
        to: &str,
        timetable: TimetableResponse,
    ) -> Self {
        self.timetables.insert(
            (line_id.to_string(), from.to_string(), to.to_string()),
            timetable,
        );
        self
    }

    pub fn with_station_arrivals(
        mut self,
        line_id: &str,
        station_id: &str,
        arrivals: Vec<StationArrival>,
    ) -> Self {
        self.station_arrivals
            .insert((line_id.to_string(), station_id.to_string()), arrivals);
        self
    }

    pub fn with_vehicle_arrivals(mut self, vehicle_id: &str, arrivals: Vec<VehicleArrival>) -> Self {
        self.vehicle_arrivals
            .insert(vehicle_id.to_string(), arrivals);
        self
    }

    /// Make the next `n` fetches fail with an upstream error.
    pub fn fail_next(self, n: usize) -> Self {
        self.fail_remaining.store(n, Ordering::SeqCst);
        self
    }

    fn check_failure(&self, resource: &'static str) -> Result<(), TflError> {
        let remaining = self.fail_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(TflError::Api {
                resource,
                status: 503,
                message: "mock failure".into(),
            });
        }
        Ok(())
    }

    fn missing(resource: &'static str, key: String) -> TflError {
        TflError::Api {
            resource,
            status: 404,
            message: format!("no fixture for {key}"),
        }
    }
}

impl TransitFetcher for MockFetcher {
    async fn fetch_lines(&self, mode: &str) -> Result<Vec<Line>, TflError> {
        self.calls.lines.fetch_add(1, Ordering::SeqCst);
        self.check_failure("lines")?;
        self.lines
            .get(mode)
            .cloned()
            .ok_or_else(|| Self::missing("lines", mode.to_string()))
    }

    async fn fetch_stations(&self, line_id: &str) -> Result<Vec<Station>, TflError> {
        self.calls.stations.fetch_add(1, Ordering::SeqCst);
        self.check_failure("stations")?;
        self.stations
            .get(line_id)
            .cloned()
            .ok_or_else(|| Self::missing("stations", line_id.to_string()))
    }

    async fn fetch_routes(&self, line_id: &str) -> Result<Vec<Route>, TflError> {
        self.calls.routes.fetch_add(1, Ordering::SeqCst);
        self.check_failure("routes")?;
        self.routes
            .get(line_id)
            .cloned()
            .ok_or_else(|| Self::missing("routes", line_id.to_string()))
    }

    async fn fetch_status(&self, mode: &str) -> Result<HashMap<String, Status>, TflError> {
        self.calls.status.fetch_add(1, Ordering::SeqCst);
        self.check_failure("status")?;
        self.statuses
            .get(mode)
            .cloned()
            .ok_or_else(|| Self::missing("status", mode.to_string()))
    }

    async fn fetch_timetable(
        &self,
        line_id: &str,
        from_station_id: &str,
        to_station_id: &str,
    ) -> Result<TimetableResponse, TflError> {
        self.calls.timetable.fetch_add(1, Ordering::SeqCst);
        self.check_failure("timetable")?;
        let key = (
            line_id.to_string(),
            from_station_id.to_string(),
            to_station_id.to_string(),
        );
        self.timetables
            .get(&key)
            .cloned()
            .ok_or_else(|| Self::missing("timetable", format!("{line_id}/{from_station_id}/{to_station_id}")))
    }

    async fn fetch_station_arrivals(
        &self,
        line_id: &str,
        station_id: &str,
    ) -> Result<Vec<StationArrival>, TflError> {
        self.calls.station_arrivals.fetch_add(1, Ordering::SeqCst);
        self.check_failure("arrivals")?;
        // Missing fixture mirrors the upstream "no active service"
        // soft-failure: empty data, no error.
        Ok(self
            .station_arrivals
            .get(&(line_id.to_string(), station_id.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_vehicle_arrivals(
        &self,
        vehicle_id: &str,
    ) -> Result<Vec<VehicleArrival>, TflError> {
        self.calls.vehicle_arrivals.fetch_add(1, Ordering::SeqCst);
        self.check_failure("vehicle arrivals")?;
        Ok(self
            .vehicle_arrivals
            .get(vehicle_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_calls_and_fails_on_demand() {
        let fetcher = MockFetcher::new()
            .with_lines("tube", vec![Line::placeholder("victoria")])
            .fail_next(1);

        assert!(fetcher.fetch_lines("tube").await.is_err());
        assert!(fetcher.fetch_lines("tube").await.is_ok());
        assert_eq!(fetcher.calls.lines.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn missing_arrivals_fixture_is_soft_empty() {
        let fetcher = MockFetcher::new();
        let arrivals = fetcher.fetch_station_arrivals("victoria", "X").await.unwrap();
        assert!(arrivals.is_empty());
    }
}
