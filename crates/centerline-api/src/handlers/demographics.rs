use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use validator::Validate;

use centerline_core::domain::DemographicsSummary;

use crate::dto::DemographicsQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/demographics?latitude=..&longitude=..&radius=..
///
/// Census trouble never fails the request; it shows up as
/// `block_groups_analyzed == 0`.
pub async fn demographics_handler(
    State(state): State<AppState>,
    query: Result<Query<DemographicsQuery>, QueryRejection>,
) -> Result<Json<DemographicsSummary>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    query
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let summary = state
        .demographics
        .summarize(query.latitude, query.longitude, query.radius)
        .await;
    Ok(Json(summary))
}
