//! Domain errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// A row is missing a required field. The row is skipped and counted.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The CSV file itself is malformed. Aborts the whole import.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An external enrichment source failed. Callers degrade instead of aborting.
    #[error("Enrichment failure: {0}")]
    Enrichment(String),

    /// An area produced no usable census units. Demographics answers with an
    /// all-zero summary instead of an error response.
    #[error("Partial data: {0}")]
    PartialData(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
