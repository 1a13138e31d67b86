mod intake;
mod repository;
mod server;
mod storage;
mod telemetry;


pub use intake::*;
pub use repository::*;
pub use server::*;
pub use storage::*;
pub use telemetry::*;

use serde::Deserialize;

/// Top-level configuration for the Lexcase server, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct LexcaseConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Case repository backend configuration.
    #[serde(default)]
    pub repository: RepositoryConfig,
    /// Object storage backend configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Intake limits and upload concurrency.
    #[serde(default)]
    pub intake: IntakeConfig,
    /// OpenTelemetry distributed tracing configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
