//! Layered configuration for the relay.
//!
//! Sources, lowest precedence first: built-in defaults, an optional
//! `configuration.{yaml,toml,json}` file in the working directory,
//! `RELAY_*` environment variables (`__` separates nested keys, e.g.
//! `RELAY_SERVER__PORT`), and finally the plain `CLIENT_ID`,
//! `CLIENT_SECRET`, `PORT` and `FRONTEND_ORIGIN` variables.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::env;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_FRONTEND_ORIGIN: &str = "https://phonepay-integration.vercel.app";
pub const DEFAULT_CLIENT_VERSION: &str = "1";

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub server: ServerSettings,
    pub provider: ProviderSettings,
    pub cors: CorsSettings,
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Which PhonePe deployment the relay talks to.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderEnvironment {
    Sandbox,
    Production,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ProviderSettings {
    pub environment: ProviderEnvironment,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<Secret<String>>,
    pub client_version: String,
    /// Overrides for individual endpoints; unset means the environment default.
    #[serde(default)]
    pub token_url: Option<String>,
    #[serde(default)]
    pub payment_url: Option<String>,
    #[serde(default)]
    pub status_base_url: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CorsSettings {
    pub frontend_origin: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct TelemetrySettings {
    pub log_level: String,
    /// OTLP collector endpoint (e.g. `http://tempo:4317`). Export is off when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

/// Client credentials used for the client-credentials grant.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: Secret<String>,
    pub client_version: String,
}

/// Fully resolved provider URLs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub token_url: String,
    pub payment_url: String,
    pub status_base_url: String,
}

impl ProviderEnvironment {
    pub fn default_endpoints(self) -> ProviderEndpoints {
        match self {
            ProviderEnvironment::Production => ProviderEndpoints {
                token_url: "https://api.phonepe.com/apis/identity-manager/v1/oauth/token"
                    .to_string(),
                payment_url: "https://api.phonepe.com/apis/pg/checkout/v2/pay".to_string(),
                status_base_url: "https://api.phonepe.com/apis/pg/checkout/v2/order".to_string(),
            },
            ProviderEnvironment::Sandbox => ProviderEndpoints {
                token_url: "https://api-preprod.phonepe.com/apis/pg-sandbox/v1/oauth/token"
                    .to_string(),
                payment_url: "https://api-preprod.phonepe.com/apis/pg-sandbox/checkout/v2/pay"
                    .to_string(),
                status_base_url:
                    "https://api-preprod.phonepe.com/apis/pg-sandbox/checkout/v2/order"
                        .to_string(),
            },
        }
    }
}

impl ProviderSettings {
    /// Returns the credentials if both id and secret are present and non-empty.
    pub fn credentials(&self) -> Option<Credentials> {
        let client_id = self.client_id.as_deref().filter(|id| !id.is_empty())?;
        let client_secret = self
            .client_secret
            .as_ref()
            .filter(|secret| !secret.expose_secret().is_empty())?;

        Some(Credentials {
            client_id: client_id.to_string(),
            client_secret: client_secret.clone(),
            client_version: self.client_version.clone(),
        })
    }

    pub fn endpoints(&self) -> ProviderEndpoints {
        let defaults = self.environment.default_endpoints();
        ProviderEndpoints {
            token_url: self.token_url.clone().unwrap_or(defaults.token_url),
            payment_url: self.payment_url.clone().unwrap_or(defaults.payment_url),
            status_base_url: self
                .status_base_url
                .clone()
                .unwrap_or(defaults.status_base_url),
        }
    }
}

impl CorsSettings {
    /// Browsers send `Origin` without a trailing slash, so strip any configured one.
    pub fn allowed_origin(&self) -> &str {
        self.frontend_origin.trim_end_matches('/')
    }
}

/// Builder pre-populated with the built-in defaults.
pub fn default_builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", i64::from(DEFAULT_PORT))?
        .set_default("provider.environment", "production")?
        .set_default("provider.client_version", DEFAULT_CLIENT_VERSION)?
        .set_default("cors.frontend_origin", DEFAULT_FRONTEND_ORIGIN)?
        .set_default("telemetry.log_level", "info")
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    dotenvy::dotenv().ok();

    let settings = default_builder()?
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("RELAY")
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override_option("provider.client_id", env::var("CLIENT_ID").ok())?
        .set_override_option("provider.client_secret", env::var("CLIENT_SECRET").ok())?
        .set_override_option("server.port", env::var("PORT").ok())?
        .set_override_option("cors.frontend_origin", env::var("FRONTEND_ORIGIN").ok())?
        .build()?;

    settings.try_deserialize::<Settings>()
}
