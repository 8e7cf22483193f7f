//! In-memory center store
//!
//! Backs local runs and tests. It enforces the same uniqueness rules as the
//! PostgreSQL schema but has no transactions, so imports run best-effort.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use centerline_core::domain::{Lease, OccupancyRow, RetailCategory, ShoppingCenter, Space, Tenant};
use centerline_core::error::DomainError;
use centerline_core::repositories::CenterStore;

#[derive(Default)]
struct State {
    centers: HashMap<Uuid, ShoppingCenter>,
    center_keys: HashMap<String, Uuid>,
    spaces: HashMap<Uuid, Space>,
    space_keys: HashMap<(Uuid, String), Uuid>,
    categories: HashMap<String, RetailCategory>,
    tenants: HashMap<Uuid, Tenant>,
    tenant_names: HashMap<String, Uuid>,
    leases: Vec<Lease>,
}

#[derive(Default)]
pub struct MemoryCenterStore {
    state: RwLock<State>,
}

impl MemoryCenterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn conflict(what: &str, key: impl std::fmt::Display) -> DomainError {
    DomainError::Storage(format!("duplicate {}: {}", what, key))
}

#[async_trait]
impl CenterStore for MemoryCenterStore {
    async fn find_center_by_key(&self, center_key: &str) -> Result<Option<ShoppingCenter>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .center_keys
            .get(center_key)
            .and_then(|id| state.centers.get(id))
            .cloned())
    }

    async fn find_center(&self, id: Uuid) -> Result<Option<ShoppingCenter>, DomainError> {
        Ok(self.state.read().await.centers.get(&id).cloned())
    }

    async fn insert_center(&self, center: &ShoppingCenter) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        if state.center_keys.contains_key(&center.center_key) {
            return Ok(false);
        }
        state.center_keys.insert(center.center_key.clone(), center.id);
        state.centers.insert(center.id, center.clone());
        Ok(true)
    }

    async fn update_center(&self, center: &ShoppingCenter) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        match state.centers.get_mut(&center.id) {
            Some(stored) => {
                *stored = center.clone();
                Ok(())
            }
            None => Err(DomainError::NotFound(format!("shopping center {}", center.id))),
        }
    }

    async fn list_centers(&self) -> Result<Vec<ShoppingCenter>, DomainError> {
        let state = self.state.read().await;
        let mut centers: Vec<_> = state.centers.values().cloned().collect();
        centers.sort_by(|a, b| a.center_key.cmp(&b.center_key));
        Ok(centers)
    }

    async fn centers_missing_location(&self) -> Result<Vec<ShoppingCenter>, DomainError> {
        let mut centers = self.list_centers().await?;
        centers.retain(|c| !c.is_geocoded());
        Ok(centers)
    }

    async fn find_space(&self, center_id: Uuid, space_key: &str) -> Result<Option<Space>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .space_keys
            .get(&(center_id, space_key.to_string()))
            .and_then(|id| state.spaces.get(id))
            .cloned())
    }

    async fn insert_space(&self, space: &Space) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if !state.centers.contains_key(&space.center_id) {
            return Err(DomainError::Storage(format!(
                "space references unknown center {}",
                space.center_id
            )));
        }
        if let Some(key) = &space.space_key {
            let index_key = (space.center_id, key.clone());
            if state.space_keys.contains_key(&index_key) {
                return Err(conflict("space key", key));
            }
            state.space_keys.insert(index_key, space.id);
        }
        state.spaces.insert(space.id, space.clone());
        Ok(())
    }

    async fn update_space_footage(&self, space_id: Uuid, square_footage: i64) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        match state.spaces.get_mut(&space_id) {
            Some(space) => {
                space.square_footage = Some(square_footage);
                Ok(())
            }
            None => Err(DomainError::NotFound(format!("space {}", space_id))),
        }
    }

    async fn find_or_create_category(&self, name: &str) -> Result<RetailCategory, DomainError> {
        let mut state = self.state.write().await;
        let category = state
            .categories
            .entry(name.to_string())
            .or_insert_with(|| RetailCategory::new(name.to_string()));
        Ok(category.clone())
    }

    async fn find_tenant_by_name(&self, name: &str) -> Result<Option<Tenant>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .tenant_names
            .get(name)
            .and_then(|id| state.tenants.get(id))
            .cloned())
    }

    async fn insert_tenant(&self, tenant: &Tenant) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        if state.tenant_names.contains_key(&tenant.name) {
            return Ok(false);
        }
        state.tenant_names.insert(tenant.name.clone(), tenant.id);
        state.tenants.insert(tenant.id, tenant.clone());
        Ok(true)
    }

    async fn update_tenant(&self, tenant: &Tenant) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        match state.tenants.get_mut(&tenant.id) {
            Some(stored) => {
                *stored = tenant.clone();
                Ok(())
            }
            None => Err(DomainError::NotFound(format!("tenant {}", tenant.id))),
        }
    }

    async fn deactivate_leases(&self, space_id: Uuid) -> Result<u64, DomainError> {
        let mut state = self.state.write().await;
        let mut count = 0;
        for lease in state
            .leases
            .iter_mut()
            .filter(|l| l.space_id == space_id && l.is_active)
        {
            lease.is_active = false;
            count += 1;
        }
        Ok(count)
    }

    async fn insert_lease(&self, lease: &Lease) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if !state.spaces.contains_key(&lease.space_id) {
            return Err(DomainError::Storage(format!(
                "lease references unknown space {}",
                lease.space_id
            )));
        }
        if lease.is_active
            && state
                .leases
                .iter()
                .any(|l| l.space_id == lease.space_id && l.is_active)
        {
            return Err(conflict("active lease for space", lease.space_id));
        }
        state.leases.push(lease.clone());
        Ok(())
    }

    async fn leases_for_space(&self, space_id: Uuid) -> Result<Vec<Lease>, DomainError> {
        let state = self.state.read().await;
        let mut leases: Vec<_> = state
            .leases
            .iter()
            .enumerate()
            .filter(|(_, l)| l.space_id == space_id)
            .collect();
        // insertion order breaks created_at ties
        leases.sort_by(|(ia, a), (ib, b)| {
            b.is_active
                .cmp(&a.is_active)
                .then(b.created_at.cmp(&a.created_at))
                .then(ib.cmp(ia))
        });
        Ok(leases.into_iter().map(|(_, l)| l.clone()).collect())
    }

    async fn occupancy(&self, center_id: Option<Uuid>) -> Result<Vec<OccupancyRow>, DomainError> {
        let state = self.state.read().await;
        let category_name = |id: Option<Uuid>| {
            id.and_then(|id| {
                state
                    .categories
                    .values()
                    .find(|c| c.id == id)
                    .map(|c| c.name.clone())
            })
        };

        let mut rows: Vec<OccupancyRow> = state
            .spaces
            .values()
            .filter(|s| center_id.map_or(true, |id| s.center_id == id))
            .map(|space| {
                let lease = state
                    .leases
                    .iter()
                    .find(|l| l.space_id == space.id && l.is_active);
                let tenant = lease.and_then(|l| state.tenants.get(&l.tenant_id));

                OccupancyRow {
                    center_id: space.center_id,
                    space_id: space.id,
                    suite_number: space.suite_number.clone(),
                    square_footage: space.square_footage,
                    tenant_id: tenant.map(|t| t.id),
                    tenant_name: tenant.map(|t| t.name.clone()),
                    category: category_name(
                        lease
                            .and_then(|l| l.category_id)
                            .or_else(|| tenant.and_then(|t| t.category_id)),
                    ),
                    is_national_chain: tenant.map_or(false, |t| t.is_national_chain),
                    is_vacant: tenant.map_or(false, |t| t.is_vacant),
                    base_rent: lease.and_then(|l| l.base_rent),
                    rent_per_area: lease.and_then(|l| l.rent_per_area),
                }
            })
            .collect();

        rows.sort_by(|a, b| {
            a.center_id
                .cmp(&b.center_id)
                .then_with(|| match (&a.suite_number, &b.suite_number) {
                    (Some(x), Some(y)) => x.cmp(y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => a.space_id.cmp(&b.space_id),
                })
        });
        Ok(rows)
    }
}
