//! HTTP handlers

pub mod centers;
pub mod demographics;
pub mod health;
pub mod import;
