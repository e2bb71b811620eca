use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No connection could be made, or it broke mid-flight.
    #[error("Could not reach {url}: {message}")]
    Network { url: String, message: String },

    /// The round trip exceeded the client's timeout.
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// The upstream answered, but not with a 2xx status.
    #[error("{url} answered with status {status}")]
    Upstream { url: String, status: u16 },

    #[error("Failed to deserialize the API response from {url}: {message}")]
    Deserialization { url: String, message: String },

    #[error("Failed to build the HTTP client: {0}")]
    ClientBuild(String),
}

impl ApiError {
    /// Classifies a transport-level `reqwest` failure.
    pub(crate) fn from_transport(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout {
                url: url.to_string(),
            }
        } else {
            ApiError::Network {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Upstream { status: 404, .. })
    }
}
