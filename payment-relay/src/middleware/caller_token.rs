//! Token supplied by the frontend on payment initiation.
//!
//! The header is read as `<scheme> <token>` split on single spaces; the
//! scheme is not checked, so `Bearer abc` and `O-Bearer abc` both yield
//! `abc`. An empty second part (`Bearer  abc`) counts as no token.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderMap};

use crate::error::RelayError;

pub const MISSING_TOKEN: &str = "Missing Token";

#[derive(Clone)]
pub struct CallerToken(pub String);

impl std::fmt::Debug for CallerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CallerToken([REDACTED])")
    }
}

impl CallerToken {
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
        let token = value.split(' ').nth(1).filter(|token| !token.is_empty())?;
        Some(Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerToken
where
    S: Send + Sync,
{
    type Rejection = RelayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers).ok_or_else(|| {
            tracing::warn!("Payment initiation without caller token");
            RelayError::Unauthorized(MISSING_TOKEN)
        })
    }
}
