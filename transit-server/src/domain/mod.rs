//! Core entity types shared across the crate.

mod line;
mod route;
mod station;

pub use line::{Line, Status};
pub use route::Route;
pub use station::Station;
