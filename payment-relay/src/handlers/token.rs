use axum::{extract::State, Json};
use secrecy::ExposeSecret;
use serde::Serialize;

use crate::error::{RelayError, UpstreamOperation};
use crate::services::metrics::record_upstream;
use crate::AppState;

pub const MISSING_CREDENTIALS: &str = "Missing CLIENT_ID or CLIENT_SECRET";

#[derive(Debug, Serialize)]
pub struct TokenIssued {
    pub access_token: String,
}

/// Fetch a fresh access token with the server-held credentials.
///
/// The token replaces whatever the store held and is also returned so the
/// frontend can present it on payment initiation.
pub async fn get_token(State(state): State<AppState>) -> Result<Json<TokenIssued>, RelayError> {
    if !state.phonepe.is_configured() {
        tracing::error!("PhonePe client credentials are not configured");
        return Err(RelayError::Configuration(MISSING_CREDENTIALS));
    }

    let token = state.phonepe.fetch_token().await.map_err(|e| {
        record_upstream(UpstreamOperation::FetchToken, false);
        tracing::error!(error = %e, "Error fetching auth token");
        RelayError::upstream(UpstreamOperation::FetchToken, e)
    })?;
    record_upstream(UpstreamOperation::FetchToken, true);

    state.tokens.replace(token.clone()).await;

    Ok(Json(TokenIssued {
        access_token: token.expose_secret().clone(),
    }))
}
