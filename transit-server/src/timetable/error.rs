//! Timetable error types.

use crate::tfl::TflError;

/// Failures while fetching, parsing or querying a timetable.
///
/// Semantic variants carry the full (line, origin, destination)
/// context so the presentation layer can render them meaningfully.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    #[error(transparent)]
    Fetch(#[from] TflError),

    #[error("no routes found for {line} from {from} to {to} in timetable")]
    NoRoutes {
        line: String,
        from: String,
        to: String,
    },

    #[error("no schedules found for {line} from {from} to {to} in timetable")]
    NoSchedules {
        line: String,
        from: String,
        to: String,
    },

    #[error("station {stop} not found in stop catalog for {line} from {from} to {to}")]
    UnknownStop {
        stop: String,
        line: String,
        from: String,
        to: String,
    },

    #[error("interval {interval} not found when processing timetable for {line} from {from} to {to}")]
    UnknownInterval {
        interval: String,
        line: String,
        from: String,
        to: String,
    },

    #[error("no journey found for departure time: {departure}")]
    NoJourney { departure: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_the_lookup_context() {
        let err = TimetableError::UnknownStop {
            stop: "940GZZLUXXX".into(),
            line: "victoria".into(),
            from: "A".into(),
            to: "B".into(),
        };
        let message = err.to_string();
        assert!(message.contains("940GZZLUXXX"));
        assert!(message.contains("victoria"));
        assert!(message.contains("from A to B"));
    }
}
