//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use tracing::error;

use crate::tfl::TflError;
use crate::timetable::TimetableError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/lines/:mode", get(list_lines))
        .route("/lines/:mode/:line_id", get(line_details))
        .route("/stations/:line_id", get(list_stations))
        .route("/routes/:line_id", get(list_routes))
        .route("/arrivals/:line_id/:station_id", get(station_arrivals))
        .route("/vehicles/:line_id/:vehicle_id", get(vehicle_schedule))
        .route("/timetables/:line_id/:from_id/:to_id", get(departure_board))
        .route(
            "/timetables/:line_id/:from_id/:to_id/:hour/:minute",
            get(scheduled_timetable),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
struct LinesQuery {
    /// Decorate the listing with live service status.
    #[serde(default)]
    status: bool,
}

/// Lines for a transit mode, optionally with live status.
async fn list_lines(
    State(state): State<AppState>,
    Path(mode): Path<String>,
    Query(query): Query<LinesQuery>,
) -> Json<Vec<LineDto>> {
    let lines = state.api.lines(&mode, query.status).await;
    Json(lines.iter().map(LineDto::from_line).collect())
}

/// One line by mode and ID.
async fn line_details(
    State(state): State<AppState>,
    Path((mode, line_id)): Path<(String, String)>,
) -> Result<Json<LineDto>, AppError> {
    match state.api.line_details(&mode, &line_id).await {
        Some(line) => Ok(Json(LineDto::from_line(&line))),
        None => Err(AppError::NotFound {
            message: format!("line {line_id} not found for mode {mode}"),
        }),
    }
}

/// Stations served by a line.
async fn list_stations(
    State(state): State<AppState>,
    Path(line_id): Path<String>,
) -> Json<Vec<StationDto>> {
    let stations = state.api.stations(&line_id).await;
    Json(stations.iter().map(StationDto::from_station).collect())
}

/// Directional routes for a line.
async fn list_routes(
    State(state): State<AppState>,
    Path(line_id): Path<String>,
) -> Json<Vec<RouteDto>> {
    let routes = state.api.routes(&line_id).await;
    Json(routes.iter().map(RouteDto::from_route).collect())
}

/// Live arrivals at a station, grouped by platform.
async fn station_arrivals(
    State(state): State<AppState>,
    Path((line_id, station_id)): Path<(String, String)>,
) -> Result<Json<ArrivalsDto>, AppError> {
    let arrivals = state.api.arrivals_for(&line_id, &station_id).await?;
    Ok(Json(ArrivalsDto::from_arrivals(&arrivals)))
}

/// Live schedule of one vehicle on a line.
async fn vehicle_schedule(
    State(state): State<AppState>,
    Path((line_id, vehicle_id)): Path<(String, String)>,
) -> Result<Json<VehicleScheduleDto>, AppError> {
    let schedule = state.api.vehicle_schedule_for(&line_id, &vehicle_id).await?;
    Ok(Json(VehicleScheduleDto::from_schedule(&schedule)))
}

/// Today's departure board between two stations.
async fn departure_board(
    State(state): State<AppState>,
    Path((line_id, from_id, to_id)): Path<(String, String, String)>,
) -> Result<Json<DepartureBoardDto>, AppError> {
    let weekday = state.api.today_weekday();
    let board = state
        .api
        .scheduled_departure_times(&line_id, &from_id, &to_id, weekday)
        .await?;
    Ok(Json(DepartureBoardDto::from_board(&board)))
}

#[derive(Debug, Deserialize)]
struct ScheduleQuery {
    /// Vehicle ID to overlay live tracking data, when known.
    #[serde(default)]
    v: Option<String>,
}

/// The resolved stop list for one scheduled departure, with live
/// vehicle tracking when a vehicle ID is supplied.
async fn scheduled_timetable(
    State(state): State<AppState>,
    Path((line_id, from_id, to_id, hour, minute)): Path<(String, String, String, String, String)>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<ScheduledTimetableDto>, AppError> {
    let weekday = state.api.today_weekday();
    let vehicle_id = query.v.unwrap_or_default();
    let timetable = state
        .api
        .scheduled_timetable(&line_id, &from_id, &to_id, weekday, &hour, &minute, &vehicle_id)
        .await?;
    Ok(Json(ScheduledTimetableDto::from_timetable(&timetable)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    NotFound { message: String },
    Internal { message: String },
}

impl From<TflError> for AppError {
    fn from(e: TflError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<TimetableError> for AppError {
    fn from(e: TimetableError) -> Self {
        match e {
            TimetableError::NoJourney { .. } => AppError::NotFound {
                message: e.to_string(),
            },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        error!(status = status.as_u16(), error = %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
