//! Input: CSV ingest and schema validation.

pub mod ingest;

pub use ingest::*;
