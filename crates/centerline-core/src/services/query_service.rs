//! Read-only projections over the center graph

use std::collections::BTreeMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Lease, OccupancyRow, ShoppingCenter, VacancyStats};
use crate::error::DomainError;
use crate::repositories::CenterStore;

pub struct CenterQueryService {
    store: Arc<dyn CenterStore>,
}

impl CenterQueryService {
    pub fn new(store: Arc<dyn CenterStore>) -> Self {
        Self { store }
    }

    pub async fn list_centers(&self) -> Result<Vec<ShoppingCenter>, DomainError> {
        let mut centers = self.store.list_centers().await?;
        centers.sort_by(|a, b| a.center_key.cmp(&b.center_key));
        Ok(centers)
    }

    pub async fn get_center(&self, id: Uuid) -> Result<ShoppingCenter, DomainError> {
        self.store
            .find_center(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("shopping center {}", id)))
    }

    /// One row per space, ordered by suite number (suite-less spaces last).
    pub async fn tenants_by_center(&self, id: Uuid) -> Result<Vec<OccupancyRow>, DomainError> {
        self.get_center(id).await?;
        let mut rows = self.store.occupancy(Some(id)).await?;
        rows.sort_by(|a, b| match (&a.suite_number, &b.suite_number) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.tenant_name.cmp(&b.tenant_name),
        });
        Ok(rows)
    }

    pub async fn vacancy_stats(&self, id: Uuid) -> Result<VacancyStats, DomainError> {
        self.get_center(id).await?;
        let rows = self.store.occupancy(Some(id)).await?;
        Ok(vacancy_from_rows(&rows))
    }

    /// Vacancy over every center in the store.
    pub async fn portfolio_vacancy(&self) -> Result<VacancyStats, DomainError> {
        let rows = self.store.occupancy(None).await?;
        Ok(vacancy_from_rows(&rows))
    }

    pub async fn space_lease_history(&self, space_id: Uuid) -> Result<Vec<Lease>, DomainError> {
        let leases = self.store.leases_for_space(space_id).await?;
        if leases.is_empty() {
            return Err(DomainError::NotFound(format!("leases for space {}", space_id)));
        }
        Ok(leases)
    }
}

pub fn vacancy_from_rows(rows: &[OccupancyRow]) -> VacancyStats {
    let mut vacancy_by_type: BTreeMap<String, usize> = BTreeMap::new();
    let mut vacant_spaces = 0;
    let mut total_square_footage: i64 = 0;
    let mut vacant_square_footage: i64 = 0;

    for row in rows {
        let footage = row.square_footage.unwrap_or(0);
        total_square_footage = total_square_footage.saturating_add(footage);
        if row.counts_as_vacant() {
            vacant_spaces += 1;
            vacant_square_footage = vacant_square_footage.saturating_add(footage);
            let label = row.tenant_name.clone().unwrap_or_else(|| "Unleased".to_string());
            *vacancy_by_type.entry(label).or_insert(0) += 1;
        }
    }

    let total_spaces = rows.len();
    let vacancy_rate = if total_spaces > 0 {
        (vacant_spaces as f64 / total_spaces as f64 * 1000.0).round() / 10.0
    } else {
        0.0
    };

    VacancyStats {
        total_spaces,
        vacant_spaces,
        occupied_spaces: total_spaces - vacant_spaces,
        vacancy_rate,
        total_square_footage,
        vacant_square_footage,
        vacancy_by_type,
    }
}
