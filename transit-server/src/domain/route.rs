//! Directional routes for a line.

use super::Station;

/// One directional ordered sequence of stations for a line.
///
/// The ID is synthesized as `route<line><index>` since the upstream
/// route-sequence endpoint does not assign one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    pub id: String,
    pub name: String,
    pub stations: Vec<Station>,
}

impl Route {
    /// ID of the first station, or "" for an empty route.
    pub fn start(&self) -> &str {
        self.stations.first().map_or("", |s| s.id.as_str())
    }

    /// ID of the final station, or "" for an empty route.
    pub fn dest(&self) -> &str {
        self.stations.last().map_or("", |s| s.id.as_str())
    }
}
