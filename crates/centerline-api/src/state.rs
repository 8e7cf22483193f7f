use std::sync::Arc;

use centerline_core::repositories::CenterStore;
use centerline_core::services::{
    CenterEnrichmentService, CenterQueryService, DemographicsAggregator, ImportReconciler,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CenterStore>,
    pub importer: Arc<ImportReconciler>,
    pub queries: Arc<CenterQueryService>,
    pub enrichment: Arc<CenterEnrichmentService>,
    pub demographics: Arc<DemographicsAggregator>,
}
