//! # Centerline Core
//!
//! Domain entities, normalisation rules, storage/enrichment ports and the
//! import, demographics and query services.

pub mod domain;
pub mod error;
pub mod import;
pub mod normalize;
pub mod repositories;
pub mod services;

pub use domain::*;
pub use error::DomainError;
