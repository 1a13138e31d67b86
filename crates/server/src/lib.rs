pub mod api;
pub mod config;
pub mod error;
pub mod repo_factory;
pub mod storage_factory;
pub mod telemetry;
