//! Tenants and retail categories (global, shared across centers)

use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetailCategory {
    pub id: Uuid,
    pub name: String,
}

impl RetailCategory {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
        }
    }
}

/// Tenant, keyed globally by its normalised name. Vacancy placeholders
/// ("Vacant", "Vacant (Office)", ...) are tenants too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub category_id: Option<Uuid>,
    pub is_national_chain: bool,
    pub is_vacant: bool,
}

impl Tenant {
    pub fn new(
        name: String,
        category_id: Option<Uuid>,
        is_national_chain: bool,
        is_vacant: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            category_id,
            is_national_chain,
            is_vacant,
        }
    }
}
