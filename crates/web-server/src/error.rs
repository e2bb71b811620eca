use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use api_client::error::ApiError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(#[from] core_types::CoreError),
    #[error("Statistics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),
    #[error("Offload error: {0}")]
    Offload(#[from] executor::OffloadError),
    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),
    #[error("Invalid record id: {0}")]
    InvalidId(String),
    #[error("Customer not found")]
    UnknownCustomer,
    #[error("Product not found")]
    UnknownProduct,
    #[error("Timed out querying the catalog services")]
    LookupTimeout,
    #[error("Catalog lookup failed: {0}")]
    Lookup(ApiError),
}

impl AppError {
    /// Classifies a failed catalog lookup for `POST /vendas`.
    pub fn from_lookup(err: ApiError, missing: AppError) -> Self {
        if err.is_not_found() {
            missing
        } else if matches!(err, ApiError::Timeout { .. }) {
            AppError::LookupTimeout
        } else {
            AppError::Lookup(err)
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::InvalidId(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Store(store::StoreError::NotFound(id)) => {
                (StatusCode::NOT_FOUND, format!("No record with id {}", id))
            }
            AppError::Store(err) => (StatusCode::CONFLICT, err.to_string()),
            AppError::UnknownCustomer | AppError::UnknownProduct => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::LookupTimeout => (StatusCode::REQUEST_TIMEOUT, self.to_string()),
            AppError::Lookup(err) => {
                tracing::error!(error = %err, "Catalog lookup failed.");
                (
                    StatusCode::BAD_GATEWAY,
                    "A catalog service could not be queried".to_string(),
                )
            }
            AppError::Offload(err) => {
                tracing::error!(error = %err, "Offloaded computation failed.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while computing statistics".to_string(),
                )
            }
            AppError::Analytics(err) => {
                tracing::error!(error = %err, "Statistics input rejected.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while computing statistics".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
