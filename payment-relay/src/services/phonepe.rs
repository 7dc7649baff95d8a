//! PhonePe PG checkout client.
//!
//! Covers the three calls the relay forwards: the OAuth client-credentials
//! grant, checkout payment initiation and order status lookup. Payment and
//! status payloads are passed through as raw bytes.

use crate::config::{Credentials, ProviderEndpoints};
use axum::body::Bytes;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use thiserror::Error;

/// PhonePe expects `O-Bearer` in place of the standard `Bearer` keyword.
pub const AUTH_SCHEME: &str = "O-Bearer";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("client credentials are not configured")]
    NotConfigured,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected token response: {0}")]
    InvalidTokenResponse(String),

    #[error("invalid provider url: {0}")]
    InvalidUrl(String),
}

/// Response from the OAuth token endpoint. Only the token itself is used.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// A successful provider response, kept byte-for-byte.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

#[derive(Clone)]
pub struct PhonePeClient {
    client: Client,
    endpoints: ProviderEndpoints,
    credentials: Option<Credentials>,
}

impl PhonePeClient {
    pub fn new(endpoints: ProviderEndpoints, credentials: Option<Credentials>) -> Self {
        Self {
            client: Client::new(),
            endpoints,
            credentials,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Run the client-credentials grant and return the issued access token.
    pub async fn fetch_token(&self) -> Result<Secret<String>, ProviderError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(ProviderError::NotConfigured)?;

        let form = [
            ("client_id", credentials.client_id.as_str()),
            ("client_version", credentials.client_version.as_str()),
            ("client_secret", credentials.client_secret.expose_secret().as_str()),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .client
            .post(&self.endpoints.token_url)
            .form(&form)
            .send()
            .await?;

        let response = read_success(response, "token").await?;

        let token: TokenResponse = serde_json::from_slice(&response.body)
            .map_err(|e| ProviderError::InvalidTokenResponse(e.to_string()))?;

        if token.access_token.is_empty() {
            return Err(ProviderError::InvalidTokenResponse(
                "empty access_token".to_string(),
            ));
        }

        tracing::info!("PhonePe access token issued");
        Ok(Secret::new(token.access_token))
    }

    /// Forward a checkout payment request. `payload` is sent unchanged.
    pub async fn initiate_payment(
        &self,
        token: &str,
        payload: Bytes,
    ) -> Result<ProviderResponse, ProviderError> {
        let response = self
            .client
            .post(&self.endpoints.payment_url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, authorization_value(token))
            .body(payload)
            .send()
            .await?;

        read_success(response, "payment").await
    }

    /// Look up the status of a checkout order.
    pub async fn check_status(
        &self,
        token: &Secret<String>,
        merchant_order_id: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        let url = self.status_url(merchant_order_id)?;

        tracing::debug!(merchant_order_id = %merchant_order_id, url = %url, "Checking order status");

        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, authorization_value(token.expose_secret()))
            .send()
            .await?;

        read_success(response, "status").await
    }

    /// `<status base>/<merchant_order_id>/status`, with the id encoded as one segment.
    pub fn status_url(&self, merchant_order_id: &str) -> Result<Url, ProviderError> {
        let base = &self.endpoints.status_base_url;
        let mut url = Url::parse(base).map_err(|e| ProviderError::InvalidUrl(e.to_string()))?;

        url.path_segments_mut()
            .map_err(|_| ProviderError::InvalidUrl(base.clone()))?
            .pop_if_empty()
            .push(merchant_order_id)
            .push("status");

        Ok(url)
    }
}

fn authorization_value(token: &str) -> String {
    format!("{} {}", AUTH_SCHEME, token)
}

async fn read_success(
    response: reqwest::Response,
    call: &'static str,
) -> Result<ProviderResponse, ProviderError> {
    let status = response.status();
    let content_type = response.headers().get(CONTENT_TYPE).cloned();
    let body = response.bytes().await?;

    tracing::debug!(call, status = %status, "PhonePe response received");

    if status.is_success() {
        Ok(ProviderResponse { content_type, body })
    } else {
        let body = String::from_utf8_lossy(&body).into_owned();
        tracing::error!(call, status = %status, body = %body, "PhonePe request rejected");
        Err(ProviderError::Status { status, body })
    }
}
