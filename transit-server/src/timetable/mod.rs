//! Weekly timetables and live journey resolution.
//!
//! A single-writer manager actor owns a map keyed by (line, origin,
//! destination) holding a parsed weekly schedule. Entries are valid
//! only for the calendar day they were built on; a lookup on a later
//! day forces a refetch that overwrites the entry.
//!
//! Timetable queries for a specific departure pass through the pure
//! journey resolution engine, which overlays live vehicle positions
//! onto the static schedule to flag delays.

mod error;
mod manager;
mod resolve;
mod store;
mod types;

pub use error::TimetableError;
pub use manager::{TimetableKey, TimetableManager};
pub use resolve::{calculate_eta, resolve_stops};
pub use store::{Journey, JourneyStop, TimetableByDayOfWeek, TimetableDetails, build_timetable};
pub use types::{
    DepartureTime, JourneyStatus, ScheduledDepartureTimes, ScheduledStop, ScheduledTimeTable,
};
