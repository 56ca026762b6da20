use crate::cli::ServeArgs;
use crate::infra::{AppState, ConfiguredDraftStore, FixedStatusSource, InMemoryApplicationRegistry};
use crate::routes::with_portal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use scheme_portal::config::AppConfig;
use scheme_portal::error::AppError;
use scheme_portal::portals::PortalService;
use scheme_portal::telemetry;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(ConfiguredDraftStore::from_config(&config.drafts));
    let drafts = store.describe();
    let registry = Arc::new(InMemoryApplicationRegistry::default());
    let status = Arc::new(FixedStatusSource::demo());
    let portal_service = Arc::new(PortalService::new(store, registry, status)?);

    let app = with_portal_routes(portal_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, drafts = %drafts, "scheme portal service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
