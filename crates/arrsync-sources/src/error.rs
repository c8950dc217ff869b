use thiserror::Error;

/// Errors raised by the HTTP adapters.
///
/// "Not found" and "rejected" are outcomes, not errors, and never appear here.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The request never produced a response (connection, TLS, timeout)
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status
    #[error("{service} returned HTTP {status}: {reason}")]
    Status {
        service: &'static str,
        status: u16,
        reason: String,
    },

    /// The watchlist body is not well-formed XML
    #[error("malformed watchlist XML: {0}")]
    Parse(String),

    /// A JSON body did not have the expected shape
    #[error("{service} returned an unexpected body: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl SourceError {
    pub fn transport(service: &'static str, source: reqwest::Error) -> Self {
        SourceError::Transport { service, source }
    }

    pub fn decode(service: &'static str, source: serde_json::Error) -> Self {
        SourceError::Decode { service, source }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, SourceError::Transport { .. })
    }
}
