use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::info;

use centerline_core::services::ImportStats;

use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/import - multipart upload with the CSV in the `file` field.
pub async fn import_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportStats>, ApiError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read field: {}", e)))?
    {
        if field.name() == Some("file") {
            filename = field.file_name().map(|s| s.to_string());
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?
                    .to_vec(),
            );
        }
    }

    let file_data = file_data.ok_or_else(|| ApiError::BadRequest("file required".to_string()))?;
    info!(
        "Importing {} ({} bytes)",
        filename.as_deref().unwrap_or("upload"),
        file_data.len()
    );

    let stats = state.importer.import_csv(&file_data).await?;
    Ok(Json(stats))
}
