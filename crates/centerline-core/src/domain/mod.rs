//! Domain entities

pub mod center;
pub mod demographics;
pub mod lease;
pub mod occupancy;
pub mod space;
pub mod tenant;

pub use center::{Address, CenterType, ClassifiedCenterType, GeoPoint, ShoppingCenter};
pub use demographics::{BlockGroupId, BlockGroupStats, CensusArea, DemographicsSummary};
pub use lease::Lease;
pub use occupancy::{OccupancyRow, VacancyStats};
pub use space::Space;
pub use tenant::{RetailCategory, Tenant};
