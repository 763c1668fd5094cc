//! Core domain types shared across ingest, aggregation, and rendering.

pub mod types;

pub use types::*;
