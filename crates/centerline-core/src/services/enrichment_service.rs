//! Geocode backfill for centers stored without coordinates

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::error::DomainError;
use crate::repositories::{CenterStore, Geocoder};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeocodeBackfill {
    pub centers_considered: usize,
    pub centers_geocoded: usize,
}

pub struct CenterEnrichmentService {
    store: Arc<dyn CenterStore>,
    geocoder: Option<Arc<dyn Geocoder>>,
}

impl CenterEnrichmentService {
    pub fn new(store: Arc<dyn CenterStore>, geocoder: Option<Arc<dyn Geocoder>>) -> Self {
        Self { store, geocoder }
    }

    /// Sequential; pacing is left to the geocoder. A no-op when no geocoder
    /// is configured.
    pub async fn geocode_missing(&self) -> Result<GeocodeBackfill, DomainError> {
        let Some(geocoder) = &self.geocoder else {
            info!("Geocoding disabled; skipping backfill");
            return Ok(GeocodeBackfill::default());
        };

        let centers = self.store.centers_missing_location().await?;
        let mut report = GeocodeBackfill {
            centers_considered: centers.len(),
            centers_geocoded: 0,
        };

        for mut center in centers {
            if center.address.is_empty() {
                continue;
            }
            let Some(result) = geocoder.geocode(&center.address).await else {
                continue;
            };
            center.location = Some(result.location);
            if center.place_id.is_none() {
                center.place_id = result.place_id;
            }
            center.updated_at = chrono::Utc::now();
            self.store.update_center(&center).await?;
            report.centers_geocoded += 1;
        }

        info!(
            "Geocode backfill: {}/{} centers geocoded",
            report.centers_geocoded, report.centers_considered
        );
        Ok(report)
    }
}
