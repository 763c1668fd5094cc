//! Mathematical utilities: ordinary least squares for trendlines.

pub mod ols;

pub use ols::*;
