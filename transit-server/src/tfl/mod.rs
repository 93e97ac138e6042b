//! TfL unified API adapter.
//!
//! A stateless request/decode layer: one function per upstream
//! resource, each issuing a single GET, decoding the JSON wire shape
//! and mapping it to domain entities. No caching and no retries live
//! here; those concerns belong to the cache actors.

mod client;
mod error;
#[cfg(test)]
pub mod mock;
pub mod types;

pub use client::{TflClient, TflConfig};
pub use error::TflError;
