//! Payment initiation and status lookup, relayed to PhonePe.

use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::{RelayError, UpstreamOperation};
use crate::middleware::CallerToken;
use crate::services::metrics::record_upstream;
use crate::services::phonepe::ProviderResponse;
use crate::AppState;

pub const NO_TOKEN_FETCHED: &str = "Get access token first";

/// Forward the frontend's payment payload with the caller's token attached.
pub async fn initiate_payment(
    State(state): State<AppState>,
    token: CallerToken,
    body: Bytes,
) -> Result<Response, RelayError> {
    let payload = checked_payload(body)?;

    tracing::info!(payload_bytes = payload.len(), "Initiating payment");

    let response = state
        .phonepe
        .initiate_payment(token.as_str(), payload)
        .await
        .map_err(|e| {
            record_upstream(UpstreamOperation::InitiatePayment, false);
            tracing::error!(error = %e, "Payment API error");
            RelayError::upstream(UpstreamOperation::InitiatePayment, e)
        })?;
    record_upstream(UpstreamOperation::InitiatePayment, true);

    Ok(passthrough(response))
}

/// Look up an order's status using the most recently fetched token.
pub async fn check_status(
    State(state): State<AppState>,
    Path(merchant_order_id): Path<String>,
) -> Result<Response, RelayError> {
    let token = state.tokens.current().await.ok_or_else(|| {
        tracing::warn!(merchant_order_id = %merchant_order_id, "Status check before token fetch");
        RelayError::Unauthorized(NO_TOKEN_FETCHED)
    })?;

    let response = state
        .phonepe
        .check_status(&token, &merchant_order_id)
        .await
        .map_err(|e| {
            record_upstream(UpstreamOperation::CheckStatus, false);
            tracing::error!(
                merchant_order_id = %merchant_order_id,
                error = %e,
                "Status check error"
            );
            RelayError::upstream(UpstreamOperation::CheckStatus, e)
        })?;
    record_upstream(UpstreamOperation::CheckStatus, true);

    Ok(passthrough(response))
}

/// An empty body is relayed as `{}`; anything else must parse as JSON and is
/// forwarded byte-for-byte.
fn checked_payload(body: Bytes) -> Result<Bytes, RelayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Bytes::from_static(b"{}"));
    }

    serde_json::from_slice::<serde::de::IgnoredAny>(&body).map_err(|e| {
        tracing::warn!(error = %e, "Rejecting malformed payment payload");
        RelayError::BadRequest(e.to_string())
    })?;

    Ok(body)
}

fn passthrough(response: ProviderResponse) -> Response {
    let content_type = response
        .content_type
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    (
        StatusCode::OK,
        [(CONTENT_TYPE, content_type)],
        Body::from(response.body),
    )
        .into_response()
}
