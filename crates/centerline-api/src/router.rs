use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers::{centers, demographics, health, import};
use crate::state::AppState;

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let api_routes = Router::new()
        .route("/api/import", post(import::import_handler))
        .route("/api/centers", get(centers::list_centers))
        .route("/api/centers/geocode", post(centers::geocode_backfill))
        .route("/api/centers/{id}", get(centers::get_center))
        .route("/api/centers/{id}/tenants", get(centers::center_tenants))
        .route("/api/centers/{id}/vacancy", get(centers::center_vacancy))
        .route("/api/vacancy", get(centers::portfolio_vacancy))
        .route("/api/spaces/{id}/leases", get(centers::space_leases))
        .route("/api/demographics", get(demographics::demographics_handler));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .with_state(state)
        // CORS
        .layer(CorsLayer::permissive())
        // Tracing
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        // Body limit (CSV uploads)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
