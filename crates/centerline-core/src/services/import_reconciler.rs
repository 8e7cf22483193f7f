//! Import reconciler: maps parsed CSV rows onto the center graph
//! (center -> space -> tenant -> lease) and tallies what happened.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{ClassifiedCenterType, Lease, RetailCategory, ShoppingCenter, Space, Tenant};
use crate::error::DomainError;
use crate::import::{parse_center_rows, CenterRow, NumberedRow};
use crate::normalize::fields::{clean, parse_decimal, parse_flag, parse_integer};
use crate::normalize::{center_key, normalize_center_type, normalize_tenant_name, space_key, TenantName};
use crate::repositories::{CenterStore, Geocoder};

#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// How many row errors are echoed back verbatim.
    pub max_sample_errors: usize,
    /// Characters kept from each sampled error message.
    pub max_error_length: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            max_sample_errors: 10,
            max_error_length: 200,
        }
    }
}

/// Import result payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportStats {
    pub rows_processed: usize,
    pub shopping_centers_created: usize,
    pub shopping_centers_updated: usize,
    pub spaces_created: usize,
    pub tenants_created: usize,
    pub leases_created: usize,
    pub geocoded_centers: usize,
    pub center_types_processed: BTreeMap<String, usize>,
    /// Center types that matched no rule and were stored verbatim.
    pub unrecognized_center_types: BTreeSet<String>,
    pub errors: usize,
    pub sample_errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CenterAction {
    Created,
    Updated,
}

/// Effects of one successful row, folded into the run only after the row
/// completes so that failed rows leave no trace in the counters.
#[derive(Debug)]
struct RowOutcome {
    center_key: String,
    center_action: CenterAction,
    center_type: Option<ClassifiedCenterType>,
    geocoded: bool,
    space_created: bool,
    tenant_created: bool,
}

/// Center as stored, what happened to it, its classified type and whether
/// this row geocoded it.
type ResolvedCenter = (ShoppingCenter, CenterAction, Option<ClassifiedCenterType>, bool);

#[derive(Debug, Default)]
struct ImportRun {
    stats: ImportStats,
    created_keys: HashSet<String>,
    updated_keys: HashSet<String>,
    /// Latest classified type per center key; tallied in `finish`.
    center_types: HashMap<String, String>,
}

impl ImportRun {
    fn record_success(&mut self, outcome: RowOutcome) {
        let stats = &mut self.stats;
        stats.rows_processed += 1;
        stats.leases_created += 1;

        match outcome.center_action {
            CenterAction::Created => {
                stats.shopping_centers_created += 1;
                self.created_keys.insert(outcome.center_key.clone());
            }
            CenterAction::Updated => {
                if !self.created_keys.contains(&outcome.center_key)
                    && self.updated_keys.insert(outcome.center_key.clone())
                {
                    stats.shopping_centers_updated += 1;
                }
            }
        }

        if let Some(center_type) = &outcome.center_type {
            self.center_types
                .insert(outcome.center_key.clone(), center_type.as_str().to_string());
            if let ClassifiedCenterType::Unrecognized(raw) = center_type {
                stats.unrecognized_center_types.insert(raw.clone());
            }
        }

        if outcome.geocoded {
            stats.geocoded_centers += 1;
        }
        if outcome.space_created {
            stats.spaces_created += 1;
        }
        if outcome.tenant_created {
            stats.tenants_created += 1;
        }
    }

    fn finish(self) -> ImportStats {
        let mut stats = self.stats;
        for center_type in self.center_types.into_values() {
            *stats.center_types_processed.entry(center_type).or_insert(0) += 1;
        }
        stats
    }

    fn record_error(&mut self, line: usize, error: &DomainError, options: &ImportOptions) {
        let stats = &mut self.stats;
        stats.rows_processed += 1;
        stats.errors += 1;
        if stats.sample_errors.len() < options.max_sample_errors {
            stats.sample_errors.push(format!(
                "Row {}: {}",
                line,
                truncate(&error.to_string(), options.max_error_length)
            ));
        }
    }
}

fn truncate(message: &str, max_chars: usize) -> String {
    if message.chars().count() <= max_chars {
        return message.to_string();
    }
    let mut cut: String = message.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

/// Copies every populated field of the row onto the center. Blank cells
/// never clear a stored value. Returns the classified center type, if any.
fn merge_row_into_center(center: &mut ShoppingCenter, row: &CenterRow) -> Option<ClassifiedCenterType> {
    fn merge(target: &mut Option<String>, incoming: Option<&str>) {
        if let Some(value) = clean(incoming) {
            *target = Some(value);
        }
    }

    let classified = row.center_type.as_deref().and_then(normalize_center_type);
    if let Some(c) = &classified {
        center.center_type = Some(c.as_str().to_string());
    }

    merge(&mut center.address.street, row.address_street.as_deref());
    merge(&mut center.address.city, row.address_city.as_deref());
    merge(&mut center.address.state, row.address_state.as_deref());
    merge(&mut center.address.zip, row.address_zip.as_deref());
    merge(&mut center.county, row.county.as_deref());
    merge(&mut center.municipality, row.municipality.as_deref());
    merge(&mut center.owner, row.owner.as_deref());
    merge(&mut center.property_manager, row.property_manager.as_deref());
    merge(&mut center.place_id, row.google_place_id.as_deref());

    if let Some(gla) = parse_integer(row.total_gla.as_deref()) {
        center.total_gla = Some(gla);
    }

    classified
}

pub struct ImportReconciler {
    store: Arc<dyn CenterStore>,
    geocoder: Option<Arc<dyn Geocoder>>,
    options: ImportOptions,
}

impl ImportReconciler {
    /// `geocoder` is `None` when no provider is configured; imports then
    /// simply leave coordinates empty.
    pub fn new(
        store: Arc<dyn CenterStore>,
        geocoder: Option<Arc<dyn Geocoder>>,
        options: ImportOptions,
    ) -> Self {
        Self {
            store,
            geocoder,
            options,
        }
    }

    /// Parses and imports a CSV file. Only a malformed file (or a failed
    /// transaction commit) is an error; row problems land in the stats.
    pub async fn import_csv(&self, data: &[u8]) -> Result<ImportStats, DomainError> {
        let rows = parse_center_rows(data)?;
        self.import_rows(rows).await
    }

    /// Applies rows strictly in input order.
    pub async fn import_rows(&self, rows: Vec<NumberedRow>) -> Result<ImportStats, DomainError> {
        info!("Starting import of {} rows", rows.len());

        let stats = match self.store.begin().await? {
            Some(tx) => {
                debug!("Import running inside a store transaction");
                let stats = self.apply_rows(tx.as_store(), &rows).await;
                tx.commit().await?;
                stats
            }
            None => self.apply_rows(self.store.as_ref(), &rows).await,
        };

        info!(
            rows = stats.rows_processed,
            centers_created = stats.shopping_centers_created,
            centers_updated = stats.shopping_centers_updated,
            spaces_created = stats.spaces_created,
            tenants_created = stats.tenants_created,
            leases_created = stats.leases_created,
            geocoded = stats.geocoded_centers,
            errors = stats.errors,
            "Import finished"
        );

        Ok(stats)
    }

    async fn apply_rows(&self, store: &dyn CenterStore, rows: &[NumberedRow]) -> ImportStats {
        let mut run = ImportRun::default();

        for numbered in rows {
            if let Err(e) = store.row_checkpoint().await {
                run.record_error(numbered.line, &e, &self.options);
                continue;
            }

            match self.apply_row(store, &numbered.row).await {
                Ok(outcome) => match store.row_release().await {
                    Ok(()) => run.record_success(outcome),
                    Err(e) => run.record_error(numbered.line, &e, &self.options),
                },
                Err(e) => {
                    debug!("Row {} skipped: {}", numbered.line, e);
                    if let Err(rollback_err) = store.row_rollback().await {
                        warn!("Failed to roll back row {}: {}", numbered.line, rollback_err);
                    }
                    run.record_error(numbered.line, &e, &self.options);
                }
            }
        }

        run.finish()
    }

    async fn apply_row(&self, store: &dyn CenterStore, row: &CenterRow) -> Result<RowOutcome, DomainError> {
        // 1. required name
        let name = clean(row.shopping_center_name.as_deref()).ok_or_else(|| {
            DomainError::Validation("shopping_center_name is required".to_string())
        })?;
        let key = center_key(&name)?;

        // 2. center
        let (center, center_action, center_type, geocoded) =
            self.resolve_center(store, &key, &name, row).await?;

        // 3. space
        let (space, space_created) = self.resolve_space(store, &center, &key, row).await?;

        // 4. tenant + category
        let tenant_name = normalize_tenant_name(row.tenant_name.as_deref().unwrap_or_default());
        let category = if tenant_name.is_vacant {
            None
        } else {
            match clean(row.retail_category.as_deref()) {
                Some(category_name) => Some(store.find_or_create_category(&category_name).await?),
                None => None,
            }
        };
        let is_chain = parse_flag(row.is_chain.as_deref());
        let (tenant, tenant_created) = self
            .resolve_tenant(store, &tenant_name, category.as_ref(), is_chain)
            .await?;

        // 5. supersede the active lease
        let superseded = store.deactivate_leases(space.id).await?;
        let lease = Lease::new(
            space.id,
            tenant.id,
            category.map(|c| c.id),
            parse_decimal(row.base_rent.as_deref()),
            space.square_footage,
        );
        store.insert_lease(&lease).await?;

        debug!(
            center = %center.name,
            suite = ?space.suite_number,
            tenant = %tenant.name,
            superseded,
            "Row applied"
        );

        Ok(RowOutcome {
            center_key: key,
            center_action,
            center_type,
            geocoded,
            space_created,
            tenant_created: tenant_created && !tenant_name.is_vacant,
        })
    }

    async fn resolve_center(
        &self,
        store: &dyn CenterStore,
        key: &str,
        name: &str,
        row: &CenterRow,
    ) -> Result<ResolvedCenter, DomainError> {
        if let Some(existing) = store.find_center_by_key(key).await? {
            return self.merge_existing_center(store, existing, row).await;
        }

        let mut center = ShoppingCenter::new(key.to_string(), name.to_string());
        let center_type = merge_row_into_center(&mut center, row);
        self.warn_unrecognized(&center, center_type.as_ref());
        let geocoded = self.try_geocode(&mut center).await;
        if store.insert_center(&center).await? {
            return Ok((center, CenterAction::Created, center_type, geocoded));
        }

        // Another import created the key between lookup and insert.
        debug!("Center {} created concurrently, merging instead", key);
        let existing = store.find_center_by_key(key).await?.ok_or_else(|| {
            DomainError::Storage(format!("center {} missing after key conflict", key))
        })?;
        self.merge_existing_center(store, existing, row).await
    }

    async fn merge_existing_center(
        &self,
        store: &dyn CenterStore,
        mut center: ShoppingCenter,
        row: &CenterRow,
    ) -> Result<ResolvedCenter, DomainError> {
        let center_type = merge_row_into_center(&mut center, row);
        self.warn_unrecognized(&center, center_type.as_ref());
        let geocoded = !center.is_geocoded() && self.try_geocode(&mut center).await;
        center.updated_at = Utc::now();
        store.update_center(&center).await?;
        Ok((center, CenterAction::Updated, center_type, geocoded))
    }

    fn warn_unrecognized(&self, center: &ShoppingCenter, center_type: Option<&ClassifiedCenterType>) {
        if let Some(ClassifiedCenterType::Unrecognized(raw)) = center_type {
            warn!(center = %center.name, center_type = %raw, "Unrecognized center type kept as-is");
        }
    }

    async fn try_geocode(&self, center: &mut ShoppingCenter) -> bool {
        let Some(geocoder) = &self.geocoder else {
            return false;
        };
        if center.address.is_empty() {
            return false;
        }

        match geocoder.geocode(&center.address).await {
            Some(result) => {
                center.location = Some(result.location);
                if center.place_id.is_none() {
                    center.place_id = result.place_id;
                }
                true
            }
            None => false,
        }
    }

    async fn resolve_space(
        &self,
        store: &dyn CenterStore,
        center: &ShoppingCenter,
        key: &str,
        row: &CenterRow,
    ) -> Result<(Space, bool), DomainError> {
        let footage = parse_integer(row.square_footage.as_deref());
        let suite = clean(row.tenant_suite_number.as_deref());
        let space_key = space_key(key, suite.as_deref());

        if let Some(space_key) = &space_key {
            if let Some(mut space) = store.find_space(center.id, space_key).await? {
                if let Some(sf) = footage {
                    store.update_space_footage(space.id, sf).await?;
                    space.square_footage = Some(sf);
                }
                return Ok((space, false));
            }
        }

        let space = Space::new(center.id, space_key, suite, footage);
        store.insert_space(&space).await?;
        Ok((space, true))
    }

    async fn resolve_tenant(
        &self,
        store: &dyn CenterStore,
        tenant_name: &TenantName,
        category: Option<&RetailCategory>,
        is_chain: bool,
    ) -> Result<(Tenant, bool), DomainError> {
        if let Some(existing) = store.find_tenant_by_name(&tenant_name.name).await? {
            let tenant = self.merge_existing_tenant(store, existing, category, is_chain).await?;
            return Ok((tenant, false));
        }

        let tenant = Tenant::new(
            tenant_name.name.clone(),
            category.map(|c| c.id),
            is_chain && !tenant_name.is_vacant,
            tenant_name.is_vacant,
        );
        if store.insert_tenant(&tenant).await? {
            return Ok((tenant, true));
        }

        debug!("Tenant {} created concurrently, merging instead", tenant_name.name);
        let existing = store
            .find_tenant_by_name(&tenant_name.name)
            .await?
            .ok_or_else(|| {
                DomainError::Storage(format!("tenant {} missing after name conflict", tenant_name.name))
            })?;
        let tenant = self.merge_existing_tenant(store, existing, category, is_chain).await?;
        Ok((tenant, false))
    }

    /// Fills a missing category and raises the chain flag; never clears either.
    async fn merge_existing_tenant(
        &self,
        store: &dyn CenterStore,
        mut tenant: Tenant,
        category: Option<&RetailCategory>,
        is_chain: bool,
    ) -> Result<Tenant, DomainError> {
        let mut changed = false;
        if tenant.category_id.is_none() {
            if let Some(category) = category {
                tenant.category_id = Some(category.id);
                changed = true;
            }
        }
        if is_chain && !tenant.is_national_chain && !tenant.is_vacant {
            tenant.is_national_chain = true;
            changed = true;
        }
        if changed {
            store.update_tenant(&tenant).await?;
        }
        Ok(tenant)
    }
}
