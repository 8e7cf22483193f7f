//! Center, tenant and vacancy read handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use centerline_core::domain::{Lease, OccupancyRow, ShoppingCenter, VacancyStats};
use centerline_core::services::GeocodeBackfill;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_centers(State(state): State<AppState>) -> Result<Json<Vec<ShoppingCenter>>, ApiError> {
    Ok(Json(state.queries.list_centers().await?))
}

pub async fn get_center(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ShoppingCenter>, ApiError> {
    Ok(Json(state.queries.get_center(id).await?))
}

pub async fn center_tenants(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<OccupancyRow>>, ApiError> {
    Ok(Json(state.queries.tenants_by_center(id).await?))
}

pub async fn center_vacancy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VacancyStats>, ApiError> {
    Ok(Json(state.queries.vacancy_stats(id).await?))
}

pub async fn portfolio_vacancy(State(state): State<AppState>) -> Result<Json<VacancyStats>, ApiError> {
    Ok(Json(state.queries.portfolio_vacancy().await?))
}

pub async fn space_leases(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Lease>>, ApiError> {
    Ok(Json(state.queries.space_lease_history(id).await?))
}

/// POST /api/centers/geocode
pub async fn geocode_backfill(State(state): State<AppState>) -> Result<Json<GeocodeBackfill>, ApiError> {
    Ok(Json(state.enrichment.geocode_missing().await?))
}
