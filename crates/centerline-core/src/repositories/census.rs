//! Census data traits (ports)

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::domain::{BlockGroupId, BlockGroupStats, CensusArea};
use crate::error::DomainError;

/// Reverse lookup of the state and county enclosing a point.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CensusAreaResolver: Send + Sync {
    async fn resolve_area(&self, latitude: f64, longitude: f64) -> Result<CensusArea, DomainError>;
}

/// Block-group enumeration and per-unit statistics.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CensusUnitSource: Send + Sync {
    async fn list_block_groups(&self, area: &CensusArea) -> Result<Vec<BlockGroupId>, DomainError>;

    /// `Ok(None)` when the source has no row for the unit.
    async fn fetch_block_group(
        &self,
        unit: &BlockGroupId,
    ) -> Result<Option<BlockGroupStats>, DomainError>;
}
