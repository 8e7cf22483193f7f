//! Key normalisation, vocabulary classification and field parsing

pub mod classifier;
pub mod fields;
pub mod keys;

pub use classifier::{normalize_center_type, normalize_tenant_name, TenantName};
pub use keys::{center_key, space_key};
