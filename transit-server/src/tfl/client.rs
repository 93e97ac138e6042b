//! TfL unified API HTTP client.
//!
//! One method per resource kind: issue a GET against the fixed
//! endpoint template, read the body, decode the wire shape and map it
//! to domain entities. Failures are typed per resource; the only
//! special case is the station-arrivals endpoint, where the provider
//! uses HTTP 400 for "no active service here" rather than an error.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::domain::{Line, Route, Station, Status};
use crate::fetch::TransitFetcher;

use super::error::TflError;
use super::types::{
    LineSummary, LineWithStatus, RouteSequence, StationArrival, StopPoint, TimetableResponse,
    VehicleArrival,
};

/// Default base URL for the TfL unified API.
const DEFAULT_BASE_URL: &str = "https://api.tfl.gov.uk";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Configuration for the TfL client.
#[derive(Debug, Clone)]
pub struct TflConfig {
    /// Base URL for the API (defaults to production TfL).
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl TflConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for TflConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// TfL unified API client.
#[derive(Debug, Clone)]
pub struct TflClient {
    http: reqwest::Client,
    base_url: String,
}

impl TflClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TflConfig) -> Result<Self, TflError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TflError::http("client", e))?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Issue a GET and return (status, body).
    async fn get(&self, resource: &'static str, url: &str) -> Result<(u16, String), TflError> {
        debug!(url, "GET");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| TflError::http(resource, e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TflError::http(resource, e))?;
        Ok((status, body))
    }

    /// GET expecting success, returning the body.
    async fn get_ok(&self, resource: &'static str, url: &str) -> Result<String, TflError> {
        let (status, body) = self.get(resource, url).await?;
        if !(200..300).contains(&status) {
            return Err(TflError::Api {
                resource,
                status,
                message: body,
            });
        }
        Ok(body)
    }

    /// Lines for a mode, sorted ascending by ID.
    pub async fn lines(&self, mode: &str) -> Result<Vec<Line>, TflError> {
        let url = format!(
            "{}/Line/Mode/{mode}/Route?serviceTypes=Regular",
            self.base_url
        );
        let body = self.get_ok("lines", &url).await?;
        let summaries: Vec<LineSummary> =
            serde_json::from_str(&body).map_err(|e| TflError::json("lines", &e, &body))?;

        let mut result: Vec<Line> = summaries
            .into_iter()
            .map(|l| Line {
                id: l.id,
                name: l.name,
                status: Status::default(),
            })
            .collect();
        result.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(result)
    }

    /// Stations served by a line, sorted ascending by name.
    pub async fn stations(&self, line_id: &str) -> Result<Vec<Station>, TflError> {
        let url = format!("{}/Line/{line_id}/StopPoints", self.base_url);
        let body = self.get_ok("stations", &url).await?;
        let stops: Vec<StopPoint> =
            serde_json::from_str(&body).map_err(|e| TflError::json("stations", &e, &body))?;

        let mut result: Vec<Station> = stops
            .into_iter()
            .map(|s| Station {
                id: s.id,
                name: s.common_name,
                lat: s.lat,
                lon: s.lon,
            })
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    /// Ordered directional routes for a line.
    ///
    /// Depends on the station fetch for the same line: stop metadata
    /// must be resolved before the ordered stop lists can be
    /// assembled. A stop ID in a route but absent from the station
    /// set is logged and skipped rather than aborting the route.
    pub async fn routes(&self, line_id: &str) -> Result<Vec<Route>, TflError> {
        let stations = self.stations(line_id).await?;
        let by_id: HashMap<&str, &Station> =
            stations.iter().map(|s| (s.id.as_str(), s)).collect();

        let url = format!("{}/Line/{line_id}/Route/Sequence/all", self.base_url);
        let body = self.get_ok("routes", &url).await?;
        let sequence: RouteSequence =
            serde_json::from_str(&body).map_err(|e| TflError::json("routes", &e, &body))?;

        let mut result = Vec::with_capacity(sequence.ordered_line_routes.len());
        for (i, ordered) in sequence.ordered_line_routes.into_iter().enumerate() {
            let mut route_stations = Vec::with_capacity(ordered.naptan_ids.len());
            for stop_id in &ordered.naptan_ids {
                match by_id.get(stop_id.as_str()) {
                    Some(station) => route_stations.push((*station).clone()),
                    None => {
                        warn!(
                            stop_id,
                            route = %ordered.name,
                            "stop referenced by route but missing from station set"
                        );
                    }
                }
            }
            result.push(Route {
                id: format!("route{line_id}{i}"),
                name: ordered.name,
                stations: route_stations,
            });
        }
        Ok(result)
    }

    /// Current status per line ID for a mode. Always fetched fresh.
    pub async fn status(&self, mode: &str) -> Result<HashMap<String, Status>, TflError> {
        let url = format!("{}/Line/Mode/{mode}/Status", self.base_url);
        let body = self.get_ok("status", &url).await?;
        let statuses: Vec<LineWithStatus> =
            serde_json::from_str(&body).map_err(|e| TflError::json("status", &e, &body))?;

        Ok(statuses
            .into_iter()
            .map(|s| {
                let descriptions = s.status_descriptions();
                (s.id, Status { descriptions })
            })
            .collect())
    }

    /// Raw weekly timetable between two stations on a line.
    pub async fn timetable(
        &self,
        line_id: &str,
        from_station_id: &str,
        to_station_id: &str,
    ) -> Result<TimetableResponse, TflError> {
        let url = format!(
            "{}/Line/{line_id}/Timetable/{from_station_id}/to/{to_station_id}",
            self.base_url
        );
        let body = self.get_ok("timetable", &url).await?;
        serde_json::from_str(&body).map_err(|e| TflError::json("timetable", &e, &body))
    }

    /// Live arrivals at a station for a line.
    ///
    /// The provider answers HTTP 400 when there is no active service
    /// for the combination; that is soft "no data", not a failure.
    pub async fn station_arrivals(
        &self,
        line_id: &str,
        station_id: &str,
    ) -> Result<Vec<StationArrival>, TflError> {
        let url = format!("{}/Line/{line_id}/Arrivals/{station_id}", self.base_url);
        let (status, body) = self.get("arrivals", &url).await?;
        if status == 400 {
            return Ok(Vec::new());
        }
        if !(200..300).contains(&status) {
            return Err(TflError::Api {
                resource: "arrivals",
                status,
                message: body,
            });
        }
        serde_json::from_str(&body).map_err(|e| TflError::json("arrivals", &e, &body))
    }

    /// Live arrivals for one vehicle.
    pub async fn vehicle_arrivals(&self, vehicle_id: &str) -> Result<Vec<VehicleArrival>, TflError> {
        let url = format!("{}/Vehicle/{vehicle_id}/Arrivals", self.base_url);
        let body = self.get_ok("vehicle arrivals", &url).await?;
        serde_json::from_str(&body).map_err(|e| TflError::json("vehicle arrivals", &e, &body))
    }
}

impl TransitFetcher for TflClient {
    async fn fetch_lines(&self, mode: &str) -> Result<Vec<Line>, TflError> {
        self.lines(mode).await
    }

    async fn fetch_stations(&self, line_id: &str) -> Result<Vec<Station>, TflError> {
        self.stations(line_id).await
    }

    async fn fetch_routes(&self, line_id: &str) -> Result<Vec<Route>, TflError> {
        self.routes(line_id).await
    }

    async fn fetch_status(&self, mode: &str) -> Result<HashMap<String, Status>, TflError> {
        self.status(mode).await
    }

    async fn fetch_timetable(
        &self,
        line_id: &str,
        from_station_id: &str,
        to_station_id: &str,
    ) -> Result<TimetableResponse, TflError> {
        self.timetable(line_id, from_station_id, to_station_id).await
    }

    async fn fetch_station_arrivals(
        &self,
        line_id: &str,
        station_id: &str,
    ) -> Result<Vec<StationArrival>, TflError> {
        self.station_arrivals(line_id, station_id).await
    }

    async fn fetch_vehicle_arrivals(
        &self,
        vehicle_id: &str,
    ) -> Result<Vec<VehicleArrival>, TflError> {
        self.vehicle_arrivals(vehicle_id).await
    }
}
