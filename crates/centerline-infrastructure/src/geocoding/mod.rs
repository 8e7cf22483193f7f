//! Geocoding adapters

pub mod google;

pub use google::GoogleGeocoder;
