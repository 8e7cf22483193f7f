//! Lease entity

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Links a space to a tenant. At most one lease per space is active; older
/// ones are kept with `is_active = false`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lease {
    pub id: Uuid,
    pub space_id: Uuid,
    pub tenant_id: Uuid,
    pub category_id: Option<Uuid>,
    pub base_rent: Option<f64>,
    pub rent_per_area: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Lease {
    /// New active lease with `rent_per_area` derived from rent and footage.
    pub fn new(
        space_id: Uuid,
        tenant_id: Uuid,
        category_id: Option<Uuid>,
        base_rent: Option<f64>,
        square_footage: Option<i64>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            space_id,
            tenant_id,
            category_id,
            base_rent,
            rent_per_area: rent_per_area(base_rent, square_footage),
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

/// `base_rent / square_footage`, rounded to cents. `None` unless both are
/// present and the footage is positive.
pub fn rent_per_area(base_rent: Option<f64>, square_footage: Option<i64>) -> Option<f64> {
    match (base_rent, square_footage) {
        (Some(rent), Some(sf)) if sf > 0 => Some((rent / sf as f64 * 100.0).round() / 100.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rent_per_area() {
        assert_eq!(rent_per_area(Some(30_000.0), Some(1_200)), Some(25.0));
        assert_eq!(rent_per_area(Some(10_000.0), Some(3)), Some(3333.33));
        assert_eq!(rent_per_area(Some(10_000.0), Some(0)), None);
        assert_eq!(rent_per_area(None, Some(1_000)), None);
        assert_eq!(rent_per_area(Some(10_000.0), None), None);
    }

    #[test]
    fn test_new_lease_is_active() {
        let lease = Lease::new(Uuid::new_v4(), Uuid::new_v4(), None, Some(12_000.0), Some(1_000));
        assert!(lease.is_active);
        assert_eq!(lease.rent_per_area, Some(12.0));
    }
}
