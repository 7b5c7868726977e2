//! Data models

pub mod telemetry;

pub use telemetry::*;
