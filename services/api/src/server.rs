use crate::cli::ServeArgs;
use crate::infra::{cors_layer, AppState, ConfiguredCatalog};
use crate::routes::with_screener_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use screener::config::AppConfig;
use screener::error::AppError;
use screener::screener::ScreenerService;
use screener::telemetry;
use std::sync::atomic::Ordering;
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
    if let Some(data_dir) = args.data_dir.take() {
        config.catalog.data_dir = data_dir;
    }

    telemetry::init(&config.telemetry)?;

    let catalog = ConfiguredCatalog::from_config(&config.catalog)?;
    info!(
        data_dir = %config.catalog.data_dir.display(),
        mode = catalog.mode(),
        "screener catalog loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let screener_service = Arc::new(ScreenerService::new(Arc::new(catalog)));

    let app = with_screener_routes(screener_service)
        .layer(Extension(app_state))
        .layer(cors_layer(&config.cors))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, origins = ?config.cors.allowed_origins, "screener api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
