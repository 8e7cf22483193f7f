use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use centerline_api::{build_router, AppState};
use centerline_core::repositories::{CenterStore, Geocoder};
use centerline_core::services::{
    CenterEnrichmentService, CenterQueryService, DemographicsAggregator, DemographicsOptions,
    ImportOptions, ImportReconciler,
};
use centerline_infrastructure::{
    create_pool, run_migrations, CensusClient, GoogleGeocoder, MemoryCenterStore, PgCenterStore,
};
use centerline_shared::config::{AppConfig, StorageBackend};
use centerline_shared::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_telemetry(&config.telemetry.log_format);

    info!("Centerline server starting...");

    let store = build_store(&config).await?;
    let geocoder = build_geocoder(&config);

    let census = Arc::new(CensusClient::new(
        config.census.acs_base_url.clone(),
        config.census.area_base_url.clone(),
        config.census.api_key().map(str::to_string),
        Duration::from_secs(config.census.timeout_secs),
    ));

    let state = AppState {
        store: store.clone(),
        importer: Arc::new(ImportReconciler::new(
            store.clone(),
            geocoder.clone(),
            ImportOptions {
                max_sample_errors: config.import.max_sample_errors,
                max_error_length: config.import.max_error_length,
            },
        )),
        queries: Arc::new(CenterQueryService::new(store.clone())),
        enrichment: Arc::new(CenterEnrichmentService::new(store, geocoder)),
        demographics: Arc::new(DemographicsAggregator::new(
            census.clone(),
            census,
            DemographicsOptions {
                max_block_groups: config.census.max_block_groups,
                fetch_concurrency: config.census.fetch_concurrency,
            },
        )),
    };

    let app = build_router(state, config.server.max_upload_bytes);

    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_store(config: &AppConfig) -> Result<Arc<dyn CenterStore>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory store");
            Ok(Arc::new(MemoryCenterStore::new()))
        }
        StorageBackend::Postgres => {
            let url = config
                .storage
                .database_url
                .as_deref()
                .context("storage.database_url is required for the postgres backend")?;

            info!("Connecting to database...");
            let pool = create_pool(
                url,
                config.storage.max_connections,
                config.storage.acquire_timeout_secs,
            )
            .await?;
            info!("Database connection established.");

            if config.storage.run_migrations {
                run_migrations(&pool).await?;
                info!("Migrations applied.");
            }

            Ok(Arc::new(PgCenterStore::new(pool, config.storage.transactional)))
        }
    }
}

fn build_geocoder(config: &AppConfig) -> Option<Arc<dyn Geocoder>> {
    let Some(api_key) = config.geocoding.api_key() else {
        info!("No geocoding API key configured; geocoding disabled");
        return None;
    };

    Some(Arc::new(GoogleGeocoder::new(
        api_key.to_string(),
        config.geocoding.base_url.clone(),
        Duration::from_millis(config.geocoding.min_interval_ms()),
        Duration::from_secs(config.geocoding.timeout_secs),
    )))
}
