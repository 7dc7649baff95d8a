#![allow(dead_code)]

use payment_relay::config::{
    CorsSettings, ProviderEnvironment, ProviderSettings, ServerSettings, Settings,
    TelemetrySettings,
};
use payment_relay::startup::Application;
use secrecy::Secret;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_CLIENT_ID: &str = "TEST-M22";
pub const TEST_CLIENT_SECRET: &str = "test-client-secret";
pub const TEST_ORIGIN: &str = "https://shop.example.com";

pub const TOKEN_PATH: &str = "/v1/oauth/token";
pub const PAY_PATH: &str = "/checkout/v2/pay";
pub const ORDER_PATH: &str = "/checkout/v2/order";

/// Settings pointing every provider endpoint at `provider_uri`.
pub fn test_settings(provider_uri: &str, with_credentials: bool) -> Settings {
    let (client_id, client_secret) = if with_credentials {
        (
            Some(TEST_CLIENT_ID.to_string()),
            Some(Secret::new(TEST_CLIENT_SECRET.to_string())),
        )
    } else {
        (None, None)
    };

    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        provider: ProviderSettings {
            environment: ProviderEnvironment::Sandbox,
            client_id,
            client_secret,
            client_version: "1".to_string(),
            token_url: Some(format!("{}{}", provider_uri, TOKEN_PATH)),
            payment_url: Some(format!("{}{}", provider_uri, PAY_PATH)),
            status_base_url: Some(format!("{}{}", provider_uri, ORDER_PATH)),
        },
        cors: CorsSettings {
            frontend_origin: format!("{}/", TEST_ORIGIN),
        },
        telemetry: TelemetrySettings {
            log_level: "debug".to_string(),
            otlp_endpoint: None,
        },
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub provider: MockServer,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(true).await
    }

    pub async fn spawn_without_credentials() -> Self {
        Self::spawn_with(false).await
    }

    async fn spawn_with(with_credentials: bool) -> Self {
        let provider = MockServer::start().await;
        let settings = test_settings(&provider.uri(), with_credentials);

        let app = Application::build(settings)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            port,
            provider,
            client,
        }
    }

    /// Make the mock provider issue `token` on the next grant.
    pub async fn mount_token(&self, token: &str) {
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": token,
                "encrypted_access_token": token,
                "expires_in": null,
                "issued_at": 1706073005,
                "expires_at": 1706697605,
                "session_expires_at": 1706697605,
                "token_type": "O-Bearer"
            })))
            .up_to_n_times(1)
            .mount(&self.provider)
            .await;
    }

    pub async fn get_token(&self) -> reqwest::Response {
        self.client
            .post(format!("{}/api/get-token", self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn initiate_payment(&self, token: Option<&str>, body: &str) -> reqwest::Response {
        let mut request = self
            .client
            .post(format!("{}/api/initiate-payment", self.address))
            .header("content-type", "application/json")
            .body(body.to_string());

        if let Some(token) = token {
            request = request.header("authorization", format!("Bearer {}", token));
        }

        request.send().await.expect("Failed to execute request")
    }

    pub async fn check_status(&self, merchant_order_id: &str) -> reqwest::Response {
        self.client
            .get(format!(
                "{}/api/check-status/{}",
                self.address, merchant_order_id
            ))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
