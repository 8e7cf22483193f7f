//! Geocoder trait (port)

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;

use crate::domain::{Address, GeoPoint};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeResult {
    pub location: GeoPoint,
    pub place_id: Option<String>,
}

/// Best-effort address lookup. Implementations log their own failures and
/// return `None`; they never surface an error to the caller, and they are
/// responsible for pacing their calls to the provider.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &Address) -> Option<GeocodeResult>;
}
