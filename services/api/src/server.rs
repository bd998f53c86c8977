use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::router;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use stay_insights::config::AppConfig;
use stay_insights::error::AppError;
use stay_insights::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let http = config.upstream.http_client()?;
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let state = AppState::new(http, &config.upstream, prometheus_handle);
    let readiness_flag = state.readiness.clone();

    let app = router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        reservations_configured = config.upstream.reservations_api_key.is_some(),
        insights_configured = config.upstream.insights_api_key.is_some(),
        "booking insights service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
