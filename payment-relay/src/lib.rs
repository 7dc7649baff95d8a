pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod services;
pub mod startup;

use crate::config::Settings;
use crate::services::{AccessTokenStore, PhonePeClient};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Settings,
    pub phonepe: PhonePeClient,
    pub tokens: AccessTokenStore,
}

impl AppState {
    pub fn new(config: Settings) -> Self {
        let phonepe = PhonePeClient::new(
            config.provider.endpoints(),
            config.provider.credentials(),
        );

        Self {
            config,
            phonepe,
            tokens: AccessTokenStore::new(),
        }
    }
}
