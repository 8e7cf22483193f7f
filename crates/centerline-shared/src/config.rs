//! Configuration management

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::error::AppError;

/// Geocoding providers ask for at least this much spacing between calls.
pub const MIN_GEOCODE_INTERVAL_MS: u64 = 100;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub geocoding: GeocodingSettings,
    pub census: CensusSettings,
    pub import: ImportSettings,
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Wrap each import in one database transaction (postgres only).
    pub transactional: bool,
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocodingSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub min_interval_ms: u64,
    pub timeout_secs: u64,
}

impl GeocodingSettings {
    /// Blank keys count as "not configured".
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn min_interval_ms(&self) -> u64 {
        self.min_interval_ms.max(MIN_GEOCODE_INTERVAL_MS)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CensusSettings {
    pub api_key: Option<String>,
    pub acs_base_url: String,
    pub area_base_url: String,
    /// Upper bound on block groups pulled per demographics request.
    pub max_block_groups: usize,
    pub fetch_concurrency: usize,
    pub timeout_secs: u64,
}

impl CensusSettings {
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImportSettings {
    pub max_sample_errors: usize,
    pub max_error_length: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetrySettings {
    pub log_format: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: AppConfig = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults only; no files or environment.
    pub fn defaults() -> Result<Self, AppError> {
        let settings: AppConfig = Self::builder()?.build()?.try_deserialize()?;
        Ok(settings)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.max_upload_bytes", 50 * 1024 * 1024)?
            .set_default("storage.backend", "memory")?
            .set_default("storage.max_connections", 10)?
            .set_default("storage.acquire_timeout_secs", 3)?
            .set_default("storage.transactional", true)?
            .set_default("storage.run_migrations", true)?
            .set_default("geocoding.base_url", "https://maps.googleapis.com/maps/api/geocode/json")?
            .set_default("geocoding.min_interval_ms", MIN_GEOCODE_INTERVAL_MS)?
            .set_default("geocoding.timeout_secs", 10)?
            .set_default("census.acs_base_url", "https://api.census.gov/data/2022/acs/acs5")?
            .set_default("census.area_base_url", "https://geo.fcc.gov/api/census/area")?
            .set_default("census.max_block_groups", 50)?
            .set_default("census.fetch_concurrency", 8)?
            .set_default("census.timeout_secs", 15)?
            .set_default("import.max_sample_errors", 10)?
            .set_default("import.max_error_length", 200)?
            .set_default("telemetry.log_format", "json")
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.storage.backend == StorageBackend::Postgres && self.storage.database_url.is_none() {
            return Err(AppError::InvalidConfig(
                "storage.database_url is required for the postgres backend".to_string(),
            ));
        }
        if self.census.max_block_groups == 0 {
            return Err(AppError::InvalidConfig(
                "census.max_block_groups must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
