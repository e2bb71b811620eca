use thiserror::Error;

/// Errors from assembling the aggregator. Gathering and composing never fail.
#[derive(Error, Debug)]
pub enum AggregatorError {
    #[error("Failed to build upstream client: {0}")]
    Client(#[from] api_client::error::ApiError),
}
