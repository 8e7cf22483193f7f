//! Read projections over the center graph

use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// One space of a center joined with its active lease, tenant and category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupancyRow {
    pub center_id: Uuid,
    pub space_id: Uuid,
    pub suite_number: Option<String>,
    pub square_footage: Option<i64>,
    pub tenant_id: Option<Uuid>,
    pub tenant_name: Option<String>,
    pub category: Option<String>,
    pub is_national_chain: bool,
    pub is_vacant: bool,
    pub base_rent: Option<f64>,
    pub rent_per_area: Option<f64>,
}

impl OccupancyRow {
    /// Spaces with no active lease count as vacant.
    pub fn counts_as_vacant(&self) -> bool {
        self.is_vacant || self.tenant_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VacancyStats {
    pub total_spaces: usize,
    pub vacant_spaces: usize,
    pub occupied_spaces: usize,
    pub vacancy_rate: f64,
    pub total_square_footage: i64,
    pub vacant_square_footage: i64,
    /// Vacancy tenant name ("Vacant (Office)", ...) -> space count.
    pub vacancy_by_type: BTreeMap<String, usize>,
}
