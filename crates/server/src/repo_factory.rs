use std::sync::Arc;

use lexcase_repo::CaseRepository;
use lexcase_repo_memory::MemoryCaseRepository;
#[cfg(feature = "postgres")]
use lexcase_repo_postgres::{PostgresCaseRepository, PostgresConfig};

use crate::config::RepositoryConfig;
use crate::error::ServerError;

/// Construct a [`CaseRepository`] from configuration.
///
/// Backends that own a schema run their migrations during construction.
pub async fn create_repository(
    config: &RepositoryConfig,
) -> Result<Arc<dyn CaseRepository>, ServerError> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryCaseRepository::new())),
        #[cfg(feature = "postgres")]
        "postgres" => create_postgres(config).await,
        other => Err(ServerError::Config(format!(
            "unsupported repository backend: {other} (is the feature enabled?)"
        ))),
    }
}

#[cfg(feature = "postgres")]
async fn create_postgres(
    config: &RepositoryConfig,
) -> Result<Arc<dyn CaseRepository>, ServerError> {
    let url = config.url.as_deref().ok_or_else(|| {
        ServerError::Config("postgres backend requires 'url' in [repository]".into())
    })?;
    let defaults = PostgresConfig::default();
    let pg_config = PostgresConfig {
        url: url.to_owned(),
        pool_size: config.pool_size.unwrap_or(defaults.pool_size),
        schema: config.schema.clone().unwrap_or(defaults.schema),
        table_prefix: config.table_prefix.clone().unwrap_or(defaults.table_prefix),
        ssl_mode: config.ssl_mode.clone(),
        ssl_root_cert: config.ssl_root_cert.clone(),
        ssl_cert: config.ssl_cert.clone(),
        ssl_key: config.ssl_key.clone(),
    };
    let repo = PostgresCaseRepository::new(pg_config)
        .await
        .map_err(|e| ServerError::Config(format!("postgres repository: {e}")))?;
    Ok(Arc::new(repo))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_backend() {
        let repo = create_repository(&RepositoryConfig::default()).await;
        assert!(repo.is_ok());
    }

    #[tokio::test]
    async fn unknown_backend_is_rejected() {
        let config = RepositoryConfig {
            backend: "mongodb".into(),
            ..RepositoryConfig::default()
        };
        let result = create_repository(&config).await;
        assert!(matches!(result, Err(ServerError::Config(msg)) if msg.contains("mongodb")));
    }
}
