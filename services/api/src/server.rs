use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::vetting_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use domain_vetting::config::AppConfig;
use domain_vetting::error::AppError;
use domain_vetting::telemetry;
use domain_vetting::vetting::FlexibilityLevel;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(level) = args.flexibility.and_then(FlexibilityLevel::new) {
        config.vetting.flexibility_level = level;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        vetting: config.vetting,
    };

    let app = vetting_router()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        flexibility = config.vetting.flexibility_level.get(),
        batch_limit = config.vetting.batch_limit,
        "domain vetting service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
