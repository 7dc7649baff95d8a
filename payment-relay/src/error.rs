use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::services::phonepe::ProviderError;

/// The three upstream calls the relay makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamOperation {
    FetchToken,
    InitiatePayment,
    CheckStatus,
}

impl UpstreamOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            UpstreamOperation::FetchToken => "fetch_token",
            UpstreamOperation::InitiatePayment => "initiate_payment",
            UpstreamOperation::CheckStatus => "check_status",
        }
    }

    /// Message returned to the caller when this operation fails upstream.
    pub fn failure_message(self) -> &'static str {
        match self {
            UpstreamOperation::FetchToken => "Failed to fetch Auth Token",
            UpstreamOperation::InitiatePayment => "Payment request failed",
            UpstreamOperation::CheckStatus => "Failed to check payment status",
        }
    }
}

impl fmt::Display for UpstreamOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Configuration(&'static str),

    #[error("Unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{operation} failed: {source}")]
    Upstream {
        operation: UpstreamOperation,
        #[source]
        source: ProviderError,
    },
}

impl RelayError {
    pub fn upstream(operation: UpstreamOperation, source: ProviderError) -> Self {
        RelayError::Upstream { operation, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Configuration(_) | RelayError::Upstream { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            RelayError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            RelayError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        // Upstream and parse details stay in the server logs.
        let error = match &self {
            RelayError::Configuration(message) => message.to_string(),
            RelayError::Unauthorized(_) => self.to_string(),
            RelayError::BadRequest(_) => "Invalid JSON payload".to_string(),
            RelayError::Upstream { operation, .. } => operation.failure_message().to_string(),
        };

        (self.status_code(), Json(ErrorResponse { error })).into_response()
    }
}
