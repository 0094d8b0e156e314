pub mod config;
pub mod error;
pub mod screener;
pub mod telemetry;
