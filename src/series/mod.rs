//! The transformation core: incident records in, ordered series and
//! trendlines out. Everything here is pure and infallible; bad rows degrade
//! to defaults instead of surfacing errors.

pub mod aggregate;
pub mod trend;

pub use aggregate::*;
pub use trend::*;
