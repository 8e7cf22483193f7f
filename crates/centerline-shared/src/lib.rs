//! # Centerline Shared
//!
//! Configuration, telemetry and start-up errors shared by the server and adapters.

pub mod config;
pub mod error;
pub mod telemetry;

pub use config::AppConfig;
pub use error::AppError;
