//! PostgreSQL store implementation

pub mod center_store_impl;
mod rows;

pub use center_store_impl::PgCenterStore;
