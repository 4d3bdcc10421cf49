use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCaseRepository};
use crate::routes::with_checklist_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use kyc_casework::config::AppConfig;
use kyc_casework::error::AppError;
use kyc_casework::telemetry;
use kyc_casework::workflows::checklist::ChecklistService;
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

    telemetry::init(&config.telemetry)?;

    let catalog = Arc::new(config.catalog.load_catalog()?);
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        catalog: catalog.clone(),
    };

    let repository = Arc::new(InMemoryCaseRepository::default());
    let checklist_service = Arc::new(ChecklistService::new(catalog.clone(), repository));

    let app = with_checklist_routes(checklist_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        entity_types = catalog.entity_types().count(),
        "kyc casework service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
