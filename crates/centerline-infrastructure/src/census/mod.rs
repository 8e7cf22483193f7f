//! US Census adapters

pub mod client;
pub mod variables;

pub use client::CensusClient;
