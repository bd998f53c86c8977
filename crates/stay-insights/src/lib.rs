pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod insights;
pub mod sources;
pub mod telemetry;
