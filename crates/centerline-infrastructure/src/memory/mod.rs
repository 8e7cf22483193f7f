//! In-memory adapters

pub mod center_store;

pub use center_store::MemoryCenterStore;
