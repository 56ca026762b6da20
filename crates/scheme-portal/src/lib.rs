pub mod config;
pub mod error;
pub mod portals;
pub mod telemetry;
