//! TfL client error types.

/// Errors from the TfL HTTP adapter.
///
/// Each variant names the resource involved so a failure surfaced to
/// the presentation layer can be shown meaningfully.
#[derive(Debug, thiserror::Error)]
pub enum TflError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("problem fetching {resource} data from API: {source}")]
    Http {
        resource: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// JSON deserialization failed. Carries a snippet of the
    /// offending body for diagnosis.
    #[error("problem parsing {resource} response data from TfL: {message} (body: {body})")]
    Json {
        resource: &'static str,
        message: String,
        body: String,
    },

    /// Upstream returned an error status code.
    #[error("TfL API error fetching {resource} ({status}): {message}")]
    Api {
        resource: &'static str,
        status: u16,
        message: String,
    },
}

impl TflError {
    pub(crate) fn http(resource: &'static str, source: reqwest::Error) -> Self {
        TflError::Http { resource, source }
    }

    pub(crate) fn json(resource: &'static str, err: &serde_json::Error, body: &str) -> Self {
        TflError::Json {
            resource,
            message: err.to_string(),
            body: body.chars().take(500).collect(),
        }
    }
}
