//! Repository and enrichment traits (ports)

pub mod census;
pub mod center_store;
pub mod geocoder;

pub use census::{CensusAreaResolver, CensusUnitSource};
pub use center_store::{CenterStore, StoreTransaction};
pub use geocoder::{GeocodeResult, Geocoder};
