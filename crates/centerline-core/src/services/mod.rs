//! Domain services (business logic)

pub mod demographics;
pub mod enrichment_service;
pub mod import_reconciler;
pub mod query_service;

pub use demographics::{DemographicsAggregator, DemographicsOptions};
pub use enrichment_service::{CenterEnrichmentService, GeocodeBackfill};
pub use import_reconciler::{ImportOptions, ImportReconciler, ImportStats};
pub use query_service::CenterQueryService;
