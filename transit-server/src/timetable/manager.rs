//! Timetable manager actor.
//!
//! One worker owns the timetable map; callers hand requests over a
//! bounded channel and wait on a oneshot reply. If the worker cannot
//! take the request in time, or the reply does not arrive, the
//! caller resolves the query with an uncached one-off fetch so one
//! slow timetable cannot stall unrelated requests.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc, Weekday};
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::warn;

use crate::cache::CacheConfig;
use crate::fetch::TransitFetcher;
use crate::vehicle::VehicleSchedule;

use super::error::TimetableError;
use super::store::{TimetableByDayOfWeek, build_timetable};
use super::types::{ScheduledDepartureTimes, ScheduledTimeTable};

/// Cache key: one timetable per (line, origin, destination).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimetableKey {
    pub line: String,
    pub from: String,
    pub to: String,
}

enum TimetableRequest {
    DepartureTimes {
        key: TimetableKey,
        weekday: Weekday,
        reply: oneshot::Sender<Result<ScheduledDepartureTimes, TimetableError>>,
    },
    Schedule {
        key: TimetableKey,
        weekday: Weekday,
        hour: String,
        minute: String,
        vehicle: Option<VehicleSchedule>,
        reply: oneshot::Sender<Result<ScheduledTimeTable, TimetableError>>,
    },
}

/// Caller handle for timetable queries.
pub struct TimetableManager<F> {
    fetcher: Arc<F>,
    tx: mpsc::Sender<TimetableRequest>,
    handoff_timeout: Duration,
}

impl<F: TransitFetcher> TimetableManager<F> {
    /// Spawn the owning worker and return the caller handle.
    pub fn new(fetcher: Arc<F>, config: &CacheConfig) -> Self {
        let (tx, rx) = mpsc::channel(1);
        tokio::spawn(run_worker(Arc::clone(&fetcher), rx));
        Self {
            fetcher,
            tx,
            handoff_timeout: config.handoff_timeout,
        }
    }

    /// The departure board between two stations for one weekday.
    pub async fn departure_times(
        &self,
        line: &str,
        from: &str,
        to: &str,
        weekday: Weekday,
    ) -> Result<ScheduledDepartureTimes, TimetableError> {
        let key = TimetableKey {
            line: line.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        };
        let (reply, rx) = oneshot::channel();
        let request = TimetableRequest::DepartureTimes {
            key: key.clone(),
            weekday,
            reply,
        };
        match self.tx.send_timeout(request, self.handoff_timeout).await {
            Ok(()) => match timeout(self.handoff_timeout, rx).await {
                Ok(Ok(result)) => return result,
                Ok(Err(_)) | Err(_) => {
                    warn!(line, "timed out waiting for timetable reply, resolving one-off");
                }
            },
            Err(_) => {
                warn!(line, "timetable manager busy, resolving one-off");
            }
        }
        let table = fetch_and_build(self.fetcher.as_ref(), &key, Utc::now().date_naive()).await?;
        Ok(table.departure_times(&key.from, &key.to, weekday))
    }

    /// The resolved stop list for one scheduled departure. A vehicle
    /// schedule, when supplied, overlays live ETAs onto the static
    /// times.
    #[allow(clippy::too_many_arguments)]
    pub async fn scheduled_timetable(
        &self,
        line: &str,
        from: &str,
        to: &str,
        weekday: Weekday,
        hour: &str,
        minute: &str,
        vehicle: Option<VehicleSchedule>,
    ) -> Result<ScheduledTimeTable, TimetableError> {
        let key = TimetableKey {
            line: line.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        };
        let (reply, rx) = oneshot::channel();
        let request = TimetableRequest::Schedule {
            key: key.clone(),
            weekday,
            hour: hour.to_string(),
            minute: minute.to_string(),
            vehicle: vehicle.clone(),
            reply,
        };
        match self.tx.send_timeout(request, self.handoff_timeout).await {
            Ok(()) => match timeout(self.handoff_timeout, rx).await {
                Ok(Ok(result)) => return result,
                Ok(Err(_)) | Err(_) => {
                    warn!(line, "timed out waiting for timetable reply, resolving one-off");
                }
            },
            Err(_) => {
                warn!(line, "timetable manager busy, resolving one-off");
            }
        }
        let table = fetch_and_build(self.fetcher.as_ref(), &key, Utc::now().date_naive()).await?;
        table.scheduled_timetable(
            &key.from,
            &key.to,
            weekday,
            hour,
            minute,
            vehicle.as_ref(),
            Utc::now(),
        )
    }
}

async fn run_worker<F: TransitFetcher>(fetcher: Arc<F>, mut rx: mpsc::Receiver<TimetableRequest>) {
    let mut cache: HashMap<TimetableKey, TimetableByDayOfWeek> = HashMap::new();

    while let Some(request) = rx.recv().await {
        match request {
            TimetableRequest::DepartureTimes { key, weekday, reply } => {
                let result = match cached_entry(fetcher.as_ref(), &mut cache, &key).await {
                    Ok(table) => Ok(table.departure_times(&key.from, &key.to, weekday)),
                    Err(e) => Err(e),
                };
                let _ = reply.send(result);
            }
            TimetableRequest::Schedule {
                key,
                weekday,
                hour,
                minute,
                vehicle,
                reply,
            } => {
                let result = match cached_entry(fetcher.as_ref(), &mut cache, &key).await {
                    Ok(table) => table.scheduled_timetable(
                        &key.from,
                        &key.to,
                        weekday,
                        &hour,
                        &minute,
                        vehicle.as_ref(),
                        Utc::now(),
                    ),
                    Err(e) => Err(e),
                };
                let _ = reply.send(result);
            }
        }
    }
}

/// The cached timetable for a key, fetching on a miss or when the
/// entry was built on an earlier day. Fetch failures propagate and
/// leave the map unchanged, so the next request retries.
async fn cached_entry<'c, F: TransitFetcher>(
    fetcher: &F,
    cache: &'c mut HashMap<TimetableKey, TimetableByDayOfWeek>,
    key: &TimetableKey,
) -> Result<&'c TimetableByDayOfWeek, TimetableError> {
    let today = Utc::now().date_naive();
    match cache.entry(key.clone()) {
        Entry::Occupied(mut occupied) => {
            if occupied.get().is_stale(today) {
                occupied.insert(fetch_and_build(fetcher, key, today).await?);
            }
            Ok(occupied.into_mut())
        }
        Entry::Vacant(vacant) => Ok(vacant.insert(fetch_and_build(fetcher, key, today).await?)),
    }
}

async fn fetch_and_build<F: TransitFetcher>(
    fetcher: &F,
    key: &TimetableKey,
    today: NaiveDate,
) -> Result<TimetableByDayOfWeek, TimetableError> {
    let wire = fetcher.fetch_timetable(&key.line, &key.from, &key.to).await?;
    build_timetable(&wire, &key.line, &key.from, &key.to, today)
}
