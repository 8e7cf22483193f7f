//! Center store trait (port)
//!
//! The import pipeline only issues resolve-or-create and merge-update style
//! calls through this trait. Implementations own their concurrency control.
//! Inserts keyed on a unique name report a lost race as `Ok(false)` rather
//! than an error, so a concurrent import can fall back to the stored row.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Lease, OccupancyRow, RetailCategory, ShoppingCenter, Space, Tenant};
use crate::error::DomainError;

#[async_trait]
pub trait CenterStore: Send + Sync {
    // --- shopping centers ---
    async fn find_center_by_key(&self, center_key: &str)
        -> Result<Option<ShoppingCenter>, DomainError>;
    async fn find_center(&self, id: Uuid) -> Result<Option<ShoppingCenter>, DomainError>;
    /// `Ok(false)` when the center key is already taken; nothing is written.
    async fn insert_center(&self, center: &ShoppingCenter) -> Result<bool, DomainError>;
    async fn update_center(&self, center: &ShoppingCenter) -> Result<(), DomainError>;
    async fn list_centers(&self) -> Result<Vec<ShoppingCenter>, DomainError>;
    async fn centers_missing_location(&self) -> Result<Vec<ShoppingCenter>, DomainError>;

    // --- spaces ---
    async fn find_space(&self, center_id: Uuid, space_key: &str)
        -> Result<Option<Space>, DomainError>;
    async fn insert_space(&self, space: &Space) -> Result<(), DomainError>;
    async fn update_space_footage(&self, space_id: Uuid, square_footage: i64)
        -> Result<(), DomainError>;

    // --- categories / tenants ---
    async fn find_or_create_category(&self, name: &str) -> Result<RetailCategory, DomainError>;
    async fn find_tenant_by_name(&self, name: &str) -> Result<Option<Tenant>, DomainError>;
    /// `Ok(false)` when the tenant name is already taken; nothing is written.
    async fn insert_tenant(&self, tenant: &Tenant) -> Result<bool, DomainError>;
    async fn update_tenant(&self, tenant: &Tenant) -> Result<(), DomainError>;

    // --- leases ---
    /// Marks every active lease of the space inactive; returns how many.
    async fn deactivate_leases(&self, space_id: Uuid) -> Result<u64, DomainError>;
    async fn insert_lease(&self, lease: &Lease) -> Result<(), DomainError>;
    /// All leases of a space, active first, newest first.
    async fn leases_for_space(&self, space_id: Uuid) -> Result<Vec<Lease>, DomainError>;

    // --- projections ---
    /// Spaces joined with their active lease; every center when `center_id` is `None`.
    async fn occupancy(&self, center_id: Option<Uuid>) -> Result<Vec<OccupancyRow>, DomainError>;

    // --- capabilities ---

    /// Opens an all-or-nothing scope for one import. Stores without
    /// transactions return `None` and the import runs best-effort.
    async fn begin(&self) -> Result<Option<Box<dyn StoreTransaction>>, DomainError> {
        Ok(None)
    }

    /// Marks the start of a row so a failed row can be undone on its own.
    async fn row_checkpoint(&self) -> Result<(), DomainError> {
        Ok(())
    }

    async fn row_release(&self) -> Result<(), DomainError> {
        Ok(())
    }

    async fn row_rollback(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

/// Store handle bound to an open transaction. Dropping it without
/// committing discards the work.
#[async_trait]
pub trait StoreTransaction: CenterStore {
    fn as_store(&self) -> &dyn CenterStore;
    async fn commit(self: Box<Self>) -> Result<(), DomainError>;
}
