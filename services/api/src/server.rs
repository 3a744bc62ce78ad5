use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryScoreStore, InMemorySnapshotSource};
use crate::routes::with_scoring_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use zakat_priority::config::AppConfig;
use zakat_priority::error::AppError;
use zakat_priority::scoring::{PriorityScoringService, SnapshotImporter};
use zakat_priority::telemetry;

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

    let source = match args.snapshots.take() {
        Some(path) => {
            let snapshots = SnapshotImporter::from_path(&path)?;
            let source = InMemorySnapshotSource::seeded(snapshots);
            info!(path = %path.display(), applications = source.len(), "seeded application snapshots");
            source
        }
        None => InMemorySnapshotSource::default(),
    };

    let scoring_service = Arc::new(PriorityScoringService::new(
        Arc::new(source),
        Arc::new(InMemoryScoreStore::default()),
        config.scoring.clone(),
    ));

    let app = with_scoring_routes(scoring_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        poverty_line = %config.scoring.poverty_line_income,
        "priority scoring service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
