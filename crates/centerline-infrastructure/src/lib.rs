//! # Centerline Infrastructure
//!
//! Storage, geocoding and census adapters for the core ports.

pub mod census;
pub mod database;
pub mod geocoding;
pub mod memory;

pub use census::CensusClient;
pub use database::{create_pool, run_migrations, PgCenterStore};
pub use geocoding::GoogleGeocoder;
pub use memory::MemoryCenterStore;
