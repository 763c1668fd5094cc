//! Dataset sources beyond local files: HTTP fetch and synthetic samples.

pub mod remote;
pub mod sample;
