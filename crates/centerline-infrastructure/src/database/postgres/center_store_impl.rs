// ============================================================================
// Centerline Infrastructure - PostgreSQL Center Store
// File: crates/centerline-infrastructure/src/database/postgres/center_store_impl.rs
// ============================================================================

use std::ops::{Deref, DerefMut};

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info};
use uuid::Uuid;

use centerline_core::domain::{Lease, OccupancyRow, RetailCategory, ShoppingCenter, Space, Tenant};
use centerline_core::error::DomainError;
use centerline_core::repositories::{CenterStore, StoreTransaction};

use super::rows::{CategoryRow, CenterRecord, LeaseRow, OccupancyRecord, SpaceRow, TenantRow};

enum Executor {
    Pool(PgPool),
    Transaction(Mutex<Transaction<'static, Postgres>>),
}

/// Either a pooled connection or the connection owned by the open
/// transaction. Both deref to a plain `PgConnection`.
enum Conn<'a> {
    Pooled(PoolConnection<Postgres>),
    Transaction(MutexGuard<'a, Transaction<'static, Postgres>>),
}

impl Deref for Conn<'_> {
    type Target = PgConnection;

    fn deref(&self) -> &PgConnection {
        match self {
            Conn::Pooled(conn) => conn,
            Conn::Transaction(tx) => tx,
        }
    }
}

impl DerefMut for Conn<'_> {
    fn deref_mut(&mut self) -> &mut PgConnection {
        match self {
            Conn::Pooled(conn) => conn,
            Conn::Transaction(tx) => tx,
        }
    }
}

fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| {
        error!("Database error {}: {}", context, e);
        DomainError::Storage(e.to_string())
    }
}

/// PostgreSQL-backed store. A handle obtained from [`CenterStore::begin`]
/// runs every call on one transaction and brackets rows with savepoints.
pub struct PgCenterStore {
    executor: Executor,
    transactional: bool,
}

impl PgCenterStore {
    pub fn new(pool: PgPool, transactional: bool) -> Self {
        Self {
            executor: Executor::Pool(pool),
            transactional,
        }
    }

    async fn conn(&self) -> Result<Conn<'_>, DomainError> {
        match &self.executor {
            Executor::Pool(pool) => pool
                .acquire()
                .await
                .map(Conn::Pooled)
                .map_err(db_error("acquiring connection")),
            Executor::Transaction(tx) => Ok(Conn::Transaction(tx.lock().await)),
        }
    }

    async fn savepoint_command(&self, sql: &'static str) -> Result<(), DomainError> {
        if !matches!(self.executor, Executor::Transaction(_)) {
            return Ok(());
        }
        let mut conn = self.conn().await?;
        sqlx::query(sql)
            .execute(&mut *conn)
            .await
            .map_err(db_error("managing row savepoint"))?;
        Ok(())
    }
}

#[async_trait]
impl CenterStore for PgCenterStore {
    async fn find_center_by_key(&self, center_key: &str) -> Result<Option<ShoppingCenter>, DomainError> {
        let mut conn = self.conn().await?;
        let row: Option<CenterRecord> = sqlx::query_as(
            r#"
            SELECT
                id, center_key, name, center_type,
                address_street, address_city, address_state, address_zip,
                county, municipality, owner, property_manager, total_gla,
                latitude, longitude, place_id, created_at, updated_at
            FROM shopping_centers
            WHERE center_key = $1
            FOR UPDATE
            "#,
        )
        .bind(center_key)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error("finding center by key"))?;

        Ok(row.map(Into::into))
    }

    async fn find_center(&self, id: Uuid) -> Result<Option<ShoppingCenter>, DomainError> {
        let mut conn = self.conn().await?;
        let row: Option<CenterRecord> = sqlx::query_as(
            r#"
            SELECT
                id, center_key, name, center_type,
                address_street, address_city, address_state, address_zip,
                county, municipality, owner, property_manager, total_gla,
                latitude, longitude, place_id, created_at, updated_at
            FROM shopping_centers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error("finding center by id"))?;

        Ok(row.map(Into::into))
    }

    async fn insert_center(&self, center: &ShoppingCenter) -> Result<bool, DomainError> {
        let mut conn = self.conn().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO shopping_centers (
                id, center_key, name, center_type,
                address_street, address_city, address_state, address_zip,
                county, municipality, owner, property_manager, total_gla,
                latitude, longitude, place_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            ON CONFLICT (center_key) DO NOTHING
            "#,
        )
        .bind(center.id)
        .bind(&center.center_key)
        .bind(&center.name)
        .bind(&center.center_type)
        .bind(&center.address.street)
        .bind(&center.address.city)
        .bind(&center.address.state)
        .bind(&center.address.zip)
        .bind(&center.county)
        .bind(&center.municipality)
        .bind(&center.owner)
        .bind(&center.property_manager)
        .bind(center.total_gla)
        .bind(center.location.map(|p| p.latitude))
        .bind(center.location.map(|p| p.longitude))
        .bind(&center.place_id)
        .bind(center.created_at)
        .bind(center.updated_at)
        .execute(&mut *conn)
        .await
        .map_err(db_error("creating shopping center"))?;

        let created = result.rows_affected() == 1;
        if created {
            info!("Created shopping center: {}", center.name);
        } else {
            debug!("Center key {} already taken", center.center_key);
        }
        Ok(created)
    }

    async fn update_center(&self, center: &ShoppingCenter) -> Result<(), DomainError> {
        let mut conn = self.conn().await?;
        let result = sqlx::query(
            r#"
            UPDATE shopping_centers SET
                name = $2, center_type = $3,
                address_street = $4, address_city = $5, address_state = $6, address_zip = $7,
                county = $8, municipality = $9, owner = $10, property_manager = $11,
                total_gla = $12, latitude = $13, longitude = $14, place_id = $15,
                updated_at = $16
            WHERE id = $1
            "#,
        )
        .bind(center.id)
        .bind(&center.name)
        .bind(&center.center_type)
        .bind(&center.address.street)
        .bind(&center.address.city)
        .bind(&center.address.state)
        .bind(&center.address.zip)
        .bind(&center.county)
        .bind(&center.municipality)
        .bind(&center.owner)
        .bind(&center.property_manager)
        .bind(center.total_gla)
        .bind(center.location.map(|p| p.latitude))
        .bind(center.location.map(|p| p.longitude))
        .bind(&center.place_id)
        .bind(center.updated_at)
        .execute(&mut *conn)
        .await
        .map_err(db_error("updating shopping center"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("shopping center {}", center.id)));
        }
        Ok(())
    }

    async fn list_centers(&self) -> Result<Vec<ShoppingCenter>, DomainError> {
        let mut conn = self.conn().await?;
        let rows: Vec<CenterRecord> = sqlx::query_as(
            r#"
            SELECT
                id, center_key, name, center_type,
                address_street, address_city, address_state, address_zip,
                county, municipality, owner, property_manager, total_gla,
                latitude, longitude, place_id, created_at, updated_at
            FROM shopping_centers
            ORDER BY center_key
            "#,
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(db_error("listing shopping centers"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn centers_missing_location(&self) -> Result<Vec<ShoppingCenter>, DomainError> {
        let mut conn = self.conn().await?;
        let rows: Vec<CenterRecord> = sqlx::query_as(
            r#"
            SELECT
                id, center_key, name, center_type,
                address_street, address_city, address_state, address_zip,
                county, municipality, owner, property_manager, total_gla,
                latitude, longitude, place_id, created_at, updated_at
            FROM shopping_centers
            WHERE latitude IS NULL OR longitude IS NULL
            ORDER BY center_key
            "#,
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(db_error("listing centers without coordinates"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_space(&self, center_id: Uuid, space_key: &str) -> Result<Option<Space>, DomainError> {
        let mut conn = self.conn().await?;
        let row: Option<SpaceRow> = sqlx::query_as(
            r#"
            SELECT id, center_id, space_key, suite_number, square_footage
            FROM spaces
            WHERE center_id = $1 AND space_key = $2
            "#,
        )
        .bind(center_id)
        .bind(space_key)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error("finding space"))?;

        Ok(row.map(Into::into))
    }

    async fn insert_space(&self, space: &Space) -> Result<(), DomainError> {
        let mut conn = self.conn().await?;
        sqlx::query(
            r#"
            INSERT INTO spaces (id, center_id, space_key, suite_number, square_footage)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(space.id)
        .bind(space.center_id)
        .bind(&space.space_key)
        .bind(&space.suite_number)
        .bind(space.square_footage)
        .execute(&mut *conn)
        .await
        .map_err(db_error("creating space"))?;

        Ok(())
    }

    async fn update_space_footage(&self, space_id: Uuid, square_footage: i64) -> Result<(), DomainError> {
        let mut conn = self.conn().await?;
        sqlx::query("UPDATE spaces SET square_footage = $2 WHERE id = $1")
            .bind(space_id)
            .bind(square_footage)
            .execute(&mut *conn)
            .await
            .map_err(db_error("updating space footage"))?;

        Ok(())
    }

    async fn find_or_create_category(&self, name: &str) -> Result<RetailCategory, DomainError> {
        let mut conn = self.conn().await?;
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row: CategoryRow = sqlx::query_as(
            r#"
            INSERT INTO retail_categories (id, name)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&mut *conn)
        .await
        .map_err(db_error("resolving retail category"))?;

        Ok(row.into())
    }

    async fn find_tenant_by_name(&self, name: &str) -> Result<Option<Tenant>, DomainError> {
        let mut conn = self.conn().await?;
        let row: Option<TenantRow> = sqlx::query_as(
            r#"
            SELECT id, name, category_id, is_national_chain, is_vacant
            FROM tenants
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error("finding tenant by name"))?;

        Ok(row.map(Into::into))
    }

    async fn insert_tenant(&self, tenant: &Tenant) -> Result<bool, DomainError> {
        debug!("Creating tenant: {}", tenant.name);
        let mut conn = self.conn().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO tenants (id, name, category_id, is_national_chain, is_vacant)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(tenant.id)
        .bind(&tenant.name)
        .bind(tenant.category_id)
        .bind(tenant.is_national_chain)
        .bind(tenant.is_vacant)
        .execute(&mut *conn)
        .await
        .map_err(db_error("creating tenant"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_tenant(&self, tenant: &Tenant) -> Result<(), DomainError> {
        let mut conn = self.conn().await?;
        sqlx::query(
            r#"
            UPDATE tenants
            SET category_id = $2, is_national_chain = $3, is_vacant = $4
            WHERE id = $1
            "#,
        )
        .bind(tenant.id)
        .bind(tenant.category_id)
        .bind(tenant.is_national_chain)
        .bind(tenant.is_vacant)
        .execute(&mut *conn)
        .await
        .map_err(db_error("updating tenant"))?;

        Ok(())
    }

    async fn deactivate_leases(&self, space_id: Uuid) -> Result<u64, DomainError> {
        let mut conn = self.conn().await?;
        let result = sqlx::query("UPDATE leases SET is_active = FALSE WHERE space_id = $1 AND is_active")
            .bind(space_id)
            .execute(&mut *conn)
            .await
            .map_err(db_error("deactivating leases"))?;

        Ok(result.rows_affected())
    }

    async fn insert_lease(&self, lease: &Lease) -> Result<(), DomainError> {
        let mut conn = self.conn().await?;
        sqlx::query(
            r#"
            INSERT INTO leases (
                id, space_id, tenant_id, category_id,
                base_rent, rent_per_area, is_active, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(lease.id)
        .bind(lease.space_id)
        .bind(lease.tenant_id)
        .bind(lease.category_id)
        .bind(lease.base_rent)
        .bind(lease.rent_per_area)
        .bind(lease.is_active)
        .bind(lease.created_at)
        .execute(&mut *conn)
        .await
        .map_err(db_error("creating lease"))?;

        Ok(())
    }

    async fn leases_for_space(&self, space_id: Uuid) -> Result<Vec<Lease>, DomainError> {
        let mut conn = self.conn().await?;
        let rows: Vec<LeaseRow> = sqlx::query_as(
            r#"
            SELECT
                id, space_id, tenant_id, category_id,
                base_rent, rent_per_area, is_active, created_at
            FROM leases
            WHERE space_id = $1
            ORDER BY is_active DESC, created_at DESC
            "#,
        )
        .bind(space_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(db_error("listing leases for space"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn occupancy(&self, center_id: Option<Uuid>) -> Result<Vec<OccupancyRow>, DomainError> {
        let mut conn = self.conn().await?;
        let rows: Vec<OccupancyRecord> = sqlx::query_as(
            r#"
            SELECT
                s.center_id,
                s.id AS space_id,
                s.suite_number,
                s.square_footage,
                t.id AS tenant_id,
                t.name AS tenant_name,
                c.name AS category,
                COALESCE(t.is_national_chain, FALSE) AS is_national_chain,
                COALESCE(t.is_vacant, FALSE) AS is_vacant,
                l.base_rent,
                l.rent_per_area
            FROM spaces s
            LEFT JOIN leases l ON l.space_id = s.id AND l.is_active
            LEFT JOIN tenants t ON t.id = l.tenant_id
            LEFT JOIN retail_categories c ON c.id = COALESCE(l.category_id, t.category_id)
            WHERE $1::uuid IS NULL OR s.center_id = $1
            ORDER BY s.center_id, s.suite_number NULLS LAST
            "#,
        )
        .bind(center_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(db_error("loading occupancy"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn begin(&self) -> Result<Option<Box<dyn StoreTransaction>>, DomainError> {
        let pool = match &self.executor {
            Executor::Pool(pool) if self.transactional => pool,
            _ => return Ok(None),
        };

        let tx = pool.begin().await.map_err(db_error("starting transaction"))?;
        Ok(Some(Box::new(PgCenterStore {
            executor: Executor::Transaction(Mutex::new(tx)),
            transactional: true,
        })))
    }

    async fn row_checkpoint(&self) -> Result<(), DomainError> {
        self.savepoint_command("SAVEPOINT import_row").await
    }

    async fn row_release(&self) -> Result<(), DomainError> {
        self.savepoint_command("RELEASE SAVEPOINT import_row").await
    }

    async fn row_rollback(&self) -> Result<(), DomainError> {
        self.savepoint_command("ROLLBACK TO SAVEPOINT import_row").await
    }
}

#[async_trait]
impl StoreTransaction for PgCenterStore {
    fn as_store(&self) -> &dyn CenterStore {
        self
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        match self.executor {
            Executor::Transaction(tx) => {
                tx.into_inner()
                    .commit()
                    .await
                    .map_err(db_error("committing import"))?;
                info!("Import transaction committed");
                Ok(())
            }
            Executor::Pool(_) => Err(DomainError::Internal(
                "commit called on a store without an open transaction".to_string(),
            )),
        }
    }
}
