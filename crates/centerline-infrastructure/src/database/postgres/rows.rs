// Internal row types for SQLx mapping

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use centerline_core::domain::{
    Address, GeoPoint, Lease, OccupancyRow, RetailCategory, ShoppingCenter, Space, Tenant,
};

#[derive(Debug, FromRow)]
pub(super) struct CenterRecord {
    pub id: Uuid,
    pub center_key: String,
    pub name: String,
    pub center_type: Option<String>,
    pub address_street: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_zip: Option<String>,
    pub county: Option<String>,
    pub municipality: Option<String>,
    pub owner: Option<String>,
    pub property_manager: Option<String>,
    pub total_gla: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub place_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CenterRecord> for ShoppingCenter {
    fn from(row: CenterRecord) -> Self {
        let location = match (row.latitude, row.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint {
                latitude,
                longitude,
            }),
            _ => None,
        };

        ShoppingCenter {
            id: row.id,
            center_key: row.center_key,
            name: row.name,
            center_type: row.center_type,
            address: Address {
                street: row.address_street,
                city: row.address_city,
                state: row.address_state,
                zip: row.address_zip,
            },
            county: row.county,
            municipality: row.municipality,
            owner: row.owner,
            property_manager: row.property_manager,
            total_gla: row.total_gla,
            location,
            place_id: row.place_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct SpaceRow {
    pub id: Uuid,
    pub center_id: Uuid,
    pub space_key: Option<String>,
    pub suite_number: Option<String>,
    pub square_footage: Option<i64>,
}

impl From<SpaceRow> for Space {
    fn from(row: SpaceRow) -> Self {
        Space {
            id: row.id,
            center_id: row.center_id,
            space_key: row.space_key,
            suite_number: row.suite_number,
            square_footage: row.square_footage,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct CategoryRow {
    pub id: Uuid,
    pub name: String,
}

impl From<CategoryRow> for RetailCategory {
    fn from(row: CategoryRow) -> Self {
        RetailCategory {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct TenantRow {
    pub id: Uuid,
    pub name: String,
    pub category_id: Option<Uuid>,
    pub is_national_chain: bool,
    pub is_vacant: bool,
}

impl From<TenantRow> for Tenant {
    fn from(row: TenantRow) -> Self {
        Tenant {
            id: row.id,
            name: row.name,
            category_id: row.category_id,
            is_national_chain: row.is_national_chain,
            is_vacant: row.is_vacant,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct LeaseRow {
    pub id: Uuid,
    pub space_id: Uuid,
    pub tenant_id: Uuid,
    pub category_id: Option<Uuid>,
    pub base_rent: Option<f64>,
    pub rent_per_area: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<LeaseRow> for Lease {
    fn from(row: LeaseRow) -> Self {
        Lease {
            id: row.id,
            space_id: row.space_id,
            tenant_id: row.tenant_id,
            category_id: row.category_id,
            base_rent: row.base_rent,
            rent_per_area: row.rent_per_area,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct OccupancyRecord {
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

impl From<OccupancyRecord> for OccupancyRow {
    fn from(row: OccupancyRecord) -> Self {
        OccupancyRow {
            center_id: row.center_id,
            space_id: row.space_id,
            suite_number: row.suite_number,
            square_footage: row.square_footage,
            tenant_id: row.tenant_id,
            tenant_name: row.tenant_name,
            category: row.category,
            is_national_chain: row.is_national_chain,
            is_vacant: row.is_vacant,
            base_rent: row.base_rent,
            rent_per_area: row.rent_per_area,
        }
    }
}
