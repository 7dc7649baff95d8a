use payment_relay::config::get_configuration;
use payment_relay::observability::init_tracing;
use payment_relay::services::init_metrics;
use payment_relay::startup::Application;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "payment-relay",
        &settings.telemetry.log_level,
        settings.telemetry.otlp_endpoint.as_deref(),
    )?;
    init_metrics()?;

    let application = Application::build(settings).await?;
    application.run_until_stopped().await?;

    Ok(())
}
