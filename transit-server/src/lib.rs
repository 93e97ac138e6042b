//! Transit information server.
//!
//! Serves line, station, route, arrival and timetable data for a
//! transit network by querying the TfL unified API and reshaping the
//! results for presentation. Lookups are memoized by single-writer
//! cache actors; timetable queries merge the weekly static schedule
//! with optional live vehicle positions to produce per-stop ETAs.

pub mod api;
pub mod arrivals;
pub mod cache;
pub mod clock;
pub mod domain;
pub mod fetch;
pub mod tfl;
pub mod timetable;
pub mod vehicle;
pub mod web;

pub use api::TransitApi;
pub use cache::CacheConfig;
pub use fetch::TransitFetcher;
pub use tfl::{TflClient, TflConfig, TflError};
