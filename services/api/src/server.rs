use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryFileStore, InMemoryNoteRepository};
use crate::routes::with_api_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use nexus_notes::config::AppConfig;
use nexus_notes::error::AppError;
use nexus_notes::telemetry;
use nexus_notes::workflows::assistant::{GeminiClient, StudyAssistant};
use nexus_notes::workflows::catalog::{
    NoteCatalogService, NoteCsvImporter, RestFileStore, RestNoteRepository,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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

    let gemini = GeminiClient::new(&config.assistant);
    if !gemini.is_configured() {
        warn!("GEMINI_API_KEY unset; assistant endpoints will return fallback text");
    }
    let assistant = Arc::new(StudyAssistant::new(Arc::new(gemini)));

    let app = match &config.backend {
        Some(backend) => {
            info!(
                base_url = %backend.base_url,
                table = %backend.table,
                "using hosted note backend"
            );
            let catalog = NoteCatalogService::new(
                Arc::new(RestNoteRepository::new(backend)),
                Arc::new(RestFileStore::new(backend)),
            );
            with_api_routes(Arc::new(catalog), assistant)
        }
        None => {
            let seed = match args.seed_csv.take() {
                Some(path) => NoteCsvImporter::from_path(path)?,
                None => Vec::new(),
            };
            warn!(
                seeded = seed.len(),
                "NOTES_BACKEND_URL unset; serving an in-memory catalog"
            );
            let catalog = NoteCatalogService::new(
                Arc::new(InMemoryNoteRepository::seeded(seed)),
                Arc::new(InMemoryFileStore::default()),
            );
            with_api_routes(Arc::new(catalog), assistant)
        }
    }
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "note sharing service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
