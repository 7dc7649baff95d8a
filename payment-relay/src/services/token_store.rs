//! Holder for the most recently issued provider access token.

use secrecy::Secret;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared access token slot.
///
/// Each successful token fetch overwrites the slot; concurrent fetches race
/// and the last writer wins. Nothing is persisted and expiry is not tracked.
#[derive(Clone, Default)]
pub struct AccessTokenStore {
    inner: Arc<RwLock<Option<Secret<String>>>>,
}

impl AccessTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn replace(&self, token: Secret<String>) {
        *self.inner.write().await = Some(token);
    }

    /// Clone of the current token, if one has been fetched.
    pub async fn current(&self) -> Option<Secret<String>> {
        self.inner.read().await.clone()
    }
}
