//! The query facade tying caches, live fetches and timetables
//! together.
//!
//! Static data (lines, stations, routes, timetables) answers through
//! the single-writer cache actors; live data (status, arrivals,
//! vehicle positions) is fetched fresh on every call.

use std::sync::Arc;

use chrono::{Utc, Weekday};
use tracing::warn;

use crate::arrivals::{Arrivals, UNTRACKABLE_VEHICLE_ID, build_arrivals};
use crate::cache::{CacheConfig, LineCache, RouteCache, StationCache};
use crate::clock;
use crate::domain::{Line, Route, Station};
use crate::fetch::TransitFetcher;
use crate::tfl::TflError;
use crate::timetable::{
    ScheduledDepartureTimes, ScheduledTimeTable, TimetableError, TimetableManager,
};
use crate::vehicle::{VehicleSchedule, build_vehicle_schedule};

/// One facade instance per process; clones of the inner [`Arc`]ed
/// fetcher feed every actor.
pub struct TransitApi<F> {
    fetcher: Arc<F>,
    lines: LineCache<F>,
    stations: StationCache<F>,
    routes: RouteCache<F>,
    timetables: TimetableManager<F>,
}

impl<F: TransitFetcher> TransitApi<F> {
    pub fn new(fetcher: Arc<F>, config: &CacheConfig) -> Self {
        Self {
            lines: LineCache::new(Arc::clone(&fetcher), config),
            stations: StationCache::new(Arc::clone(&fetcher), config),
            routes: RouteCache::new(Arc::clone(&fetcher), config),
            timetables: TimetableManager::new(Arc::clone(&fetcher), config),
            fetcher,
        }
    }

    /// Lines for a mode, optionally decorated with current status.
    ///
    /// Statuses are live data and fetched fresh on every call; a
    /// status failure degrades to the undecorated listing rather
    /// than failing it.
    pub async fn lines(&self, mode: &str, include_status: bool) -> Vec<Line> {
        let mut lines = self.lines.list(mode).await;
        if lines.is_empty() || !include_status {
            return lines;
        }
        let mut statuses = match self.fetcher.fetch_status(mode).await {
            Ok(statuses) => statuses,
            Err(e) => {
                warn!(mode, error = %e, "status fetch failed, listing without status");
                return lines;
            }
        };
        for line in &mut lines {
            line.status = statuses.remove(&line.id).unwrap_or_default();
        }
        lines
    }

    /// One line by ID. `None` when either argument is blank or the
    /// lookup failed outright; an unknown ID within a known mode
    /// yields the placeholder line.
    pub async fn line_details(&self, mode: &str, line_id: &str) -> Option<Line> {
        if line_id.is_empty() {
            warn!("line details requested without a line ID");
            return None;
        }
        if mode.is_empty() {
            warn!(line_id, "line details requested without a mode");
            return Some(Line::placeholder(line_id));
        }
        self.lines.details(mode, line_id).await
    }

    /// Stations served by a line, sorted by name. Empty on failure.
    pub async fn stations(&self, line_id: &str) -> Vec<Station> {
        self.stations.for_line(line_id).await
    }

    /// Directional routes for a line. Empty on failure.
    pub async fn routes(&self, line_id: &str) -> Vec<Route> {
        self.routes.for_line(line_id).await
    }

    /// Live arrivals at a station, grouped by platform. Never
    /// cached.
    pub async fn arrivals_for(&self, line_id: &str, station_id: &str) -> Result<Arrivals, TflError> {
        let records = self.fetcher.fetch_station_arrivals(line_id, station_id).await?;
        Ok(build_arrivals(records))
    }

    /// Live schedule of one vehicle on a line. Never cached.
    pub async fn vehicle_schedule_for(
        &self,
        line_id: &str,
        vehicle_id: &str,
    ) -> Result<VehicleSchedule, TflError> {
        let records = self.fetcher.fetch_vehicle_arrivals(vehicle_id).await?;
        Ok(build_vehicle_schedule(records, line_id, vehicle_id))
    }

    /// The departure board between two stations for one weekday.
    pub async fn scheduled_departure_times(
        &self,
        line_id: &str,
        from: &str,
        to: &str,
        weekday: Weekday,
    ) -> Result<ScheduledDepartureTimes, TimetableError> {
        self.timetables.departure_times(line_id, from, to, weekday).await
    }

    /// The resolved stop list for one scheduled departure.
    ///
    /// A non-empty, trackable vehicle ID triggers a live lookup
    /// whose result is overlaid on the static times; a failed or
    /// empty lookup degrades to the static view.
    #[allow(clippy::too_many_arguments)]
    pub async fn scheduled_timetable(
        &self,
        line_id: &str,
        from: &str,
        to: &str,
        weekday: Weekday,
        hour: &str,
        minute: &str,
        vehicle_id: &str,
    ) -> Result<ScheduledTimeTable, TimetableError> {
        let vehicle = self.vehicle_overlay(line_id, vehicle_id).await;
        self.timetables
            .scheduled_timetable(line_id, from, to, weekday, hour, minute, vehicle)
            .await
    }

    async fn vehicle_overlay(&self, line_id: &str, vehicle_id: &str) -> Option<VehicleSchedule> {
        if vehicle_id.is_empty() || vehicle_id == UNTRACKABLE_VEHICLE_ID {
            return None;
        }
        match self.vehicle_schedule_for(line_id, vehicle_id).await {
            Ok(schedule) if schedule.is_empty() => None,
            Ok(schedule) => Some(schedule),
            Err(e) => {
                warn!(line_id, vehicle_id, error = %e, "vehicle lookup failed, using static timetable");
                None
            }
        }
    }

    /// Today's weekday in the display timezone, which decides the
    /// timetable bucket for "now" queries.
    pub fn today_weekday(&self) -> Weekday {
        use chrono::Datelike;
        clock::to_display(Utc::now()).weekday()
    }
}
