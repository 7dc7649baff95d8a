//! Application startup and lifecycle management.

use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{CorsSettings, Settings};
use crate::handlers;
use crate::middleware::{metrics_middleware, request_id_middleware, REQUEST_ID_HEADER};
use crate::AppState;

/// CORS policy admitting only the configured frontend origin.
///
/// `AllowOrigin::list` echoes the origin only when the request's `Origin`
/// matches; other origins get no `access-control-allow-origin`.
pub fn cors_layer(settings: &CorsSettings) -> anyhow::Result<CorsLayer> {
    let origin = settings.allowed_origin();
    let origin = origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin '{}'", origin))?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
}

pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.config.cors)?;

    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .route("/api/get-token", post(handlers::token::get_token))
        .route(
            "/api/initiate-payment",
            post(handlers::payments::initiate_payment),
        )
        .route(
            "/api/check-status/:merchant_order_id",
            get(handlers::payments::check_status),
        )
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(cors)
        .with_state(state);

    Ok(router)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Bind the listener (port 0 picks a free port) and assemble the router.
    pub async fn build(settings: Settings) -> anyhow::Result<Self> {
        let state = AppState::new(settings.clone());

        if state.phonepe.is_configured() {
            tracing::info!(
                environment = ?settings.provider.environment,
                "PhonePe client initialized"
            );
        } else {
            tracing::warn!("PhonePe credentials not configured - token requests will fail");
        }

        let router = build_router(state)?;

        let address = format!("{}:{}", settings.server.host, settings.server.port);
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> anyhow::Result<()> {
        tracing::info!("Server running on port {}", self.port);
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }
}
