use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use lexcase_core::{
    Attachment, AttachmentId, Case, CaseId, CaseStatus, NewAttachment, NewCase, UserId,
};
use lexcase_repo::error::RepoError;
use lexcase_repo::repository::CaseRepository;

use crate::config::PostgresConfig;
use crate::migrations;

type CaseRow = (
    Uuid,
    String,
    String,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
);

type AttachmentRow = (
    Uuid,
    Uuid,
    String,
    String,
    String,
    i64,
    String,
    DateTime<Utc>,
);

const CASE_COLUMNS: &str = "id, user_id, title, description, status, created_at, updated_at";
const ATTACHMENT_COLUMNS: &str =
    "id, case_id, storage_bucket, storage_path, file_name, file_size, mime_type, created_at";

/// Build `PgConnectOptions` from a [`PostgresConfig`], applying SSL settings
/// when configured.
pub(crate) fn build_connect_options(
    config: &PostgresConfig,
) -> Result<sqlx::postgres::PgConnectOptions, RepoError> {
    let mut options: sqlx::postgres::PgConnectOptions = config
        .url
        .parse()
        .map_err(|e: sqlx::Error| RepoError::Connection(e.to_string()))?;

    if let Some(ref mode) = config.ssl_mode {
        let ssl_mode = match mode.as_str() {
            "disable" => sqlx::postgres::PgSslMode::Disable,
            "prefer" => sqlx::postgres::PgSslMode::Prefer,
            "require" => sqlx::postgres::PgSslMode::Require,
            "verify-ca" => sqlx::postgres::PgSslMode::VerifyCa,
            "verify-full" => sqlx::postgres::PgSslMode::VerifyFull,
            other => {
                return Err(RepoError::Connection(format!("unknown ssl_mode: {other}")));
            }
        };
        options = options.ssl_mode(ssl_mode);
    }

    if let Some(ref path) = config.ssl_root_cert {
        options = options.ssl_root_cert(path);
    }

    if let Some(ref path) = config.ssl_cert {
        options = options.ssl_client_cert(path);
    }

    if let Some(ref path) = config.ssl_key {
        options = options.ssl_client_key(path);
    }

    Ok(options)
}

/// Map a driver error onto [`RepoError`], separating pool and I/O failures
/// from statement failures.
fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => RepoError::Connection(err.to_string()),
        other => RepoError::Backend(other.to_string()),
    }
}

fn case_from_row(row: CaseRow) -> Result<Case, RepoError> {
    let (id, user_id, title, description, status, created_at, updated_at) = row;
    let status: CaseStatus = status
        .parse()
        .map_err(|e: lexcase_core::UnknownStatus| RepoError::Serialization(e.to_string()))?;
    Ok(Case {
        id: CaseId::from_uuid(id),
        user_id: UserId::new(user_id),
        title,
        description,
        status,
        created_at,
        updated_at,
    })
}

fn attachment_from_row(row: AttachmentRow) -> Result<Attachment, RepoError> {
    let (id, case_id, storage_bucket, storage_path, file_name, file_size, mime_type, created_at) =
        row;
    let file_size = u64::try_from(file_size)
        .map_err(|_| RepoError::Serialization(format!("negative file_size: {file_size}")))?;
    Ok(Attachment {
        id: AttachmentId::from_uuid(id),
        case_id: CaseId::from_uuid(case_id),
        storage_bucket,
        storage_path,
        file_name,
        file_size,
        mime_type,
        created_at,
    })
}

/// PostgreSQL-backed implementation of [`CaseRepository`].
///
/// Identifiers are generated client side (UUID v7) while timestamps come from
/// the database clock via `NOW()`.
pub struct PostgresCaseRepository {
    pool: PgPool,
    config: Arc<PostgresConfig>,
}

impl PostgresCaseRepository {
    /// Create a new `PostgresCaseRepository` from the provided configuration.
    ///
    /// Connects to `PostgreSQL`, creates the connection pool, and runs
    /// migrations to ensure the required tables exist.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Connection`] if pool creation fails, or
    /// [`RepoError::Backend`] if migrations fail.
    pub async fn new(config: PostgresConfig) -> Result<Self, RepoError> {
        let connect_options = build_connect_options(&config)?;
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.pool_size)
            .connect_with(connect_options)
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        Self::from_pool(pool, config).await
    }

    /// Create a `PostgresCaseRepository` from an existing pool and config.
    ///
    /// Runs migrations on creation.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Backend`] if migrations fail.
    pub async fn from_pool(pool: PgPool, config: PostgresConfig) -> Result<Self, RepoError> {
        migrations::run_migrations(&pool, &config)
            .await
            .map_err(|e| RepoError::Backend(e.to_string()))?;

        Ok(Self {
            pool,
            config: Arc::new(config),
        })
    }
}

#[async_trait]
impl CaseRepository for PostgresCaseRepository {
    #[instrument(skip(self, case), fields(backend = "postgres", user_id = %case.user_id))]
    async fn create_case(&self, case: NewCase) -> Result<Case, RepoError> {
        let table = self.config.cases_table();
        let id = CaseId::generate();
        let query = format!(
            "INSERT INTO {table} (id, user_id, title, description, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, NOW(), NOW()) \
             RETURNING {CASE_COLUMNS}"
        );

        let row: CaseRow = sqlx::query_as(&query)
            .bind(id.as_uuid())
            .bind(case.user_id.as_str())
            .bind(&case.title)
            .bind(&case.description)
            .bind(CaseStatus::default().as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        debug!(case_id = %id, "case row inserted");
        case_from_row(row)
    }

    #[instrument(skip(self, attachment), fields(backend = "postgres", case_id = %attachment.case_id))]
    async fn add_attachment(&self, attachment: NewAttachment) -> Result<Attachment, RepoError> {
        let table = self.config.attachments_table();
        let id = AttachmentId::generate();
        let file_size = i64::try_from(attachment.file_size).map_err(|_| {
            RepoError::Serialization(format!("file_size too large: {}", attachment.file_size))
        })?;
        let query = format!(
            "INSERT INTO {table} \
             (id, case_id, storage_bucket, storage_path, file_name, file_size, mime_type, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW()) \
             RETURNING {ATTACHMENT_COLUMNS}"
        );

        let row: AttachmentRow = sqlx::query_as(&query)
            .bind(id.as_uuid())
            .bind(attachment.case_id.as_uuid())
            .bind(&attachment.storage_bucket)
            .bind(&attachment.storage_path)
            .bind(&attachment.file_name)
            .bind(file_size)
            .bind(&attachment.mime_type)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                    RepoError::CaseNotFound(attachment.case_id)
                }
                other => map_sqlx_error(other),
            })?;

        debug!(attachment_id = %id, "attachment row inserted");
        attachment_from_row(row)
    }

    async fn get_case(&self, id: CaseId) -> Result<Option<Case>, RepoError> {
        let table = self.config.cases_table();
        let query = format!("SELECT {CASE_COLUMNS} FROM {table} WHERE id = $1");

        let row: Option<CaseRow> = sqlx::query_as(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(case_from_row).transpose()
    }

    async fn list_cases(&self, user_id: &UserId) -> Result<Vec<Case>, RepoError> {
        let table = self.config.cases_table();
        let query = format!(
            "SELECT {CASE_COLUMNS} FROM {table} WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );

        let rows: Vec<CaseRow> = sqlx::query_as(&query)
            .bind(user_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(case_from_row).collect()
    }

    async fn list_attachments(&self, case_id: CaseId) -> Result<Vec<Attachment>, RepoError> {
        let table = self.config.attachments_table();
        let query = format!(
            "SELECT {ATTACHMENT_COLUMNS} FROM {table} WHERE case_id = $1 \
             ORDER BY created_at ASC, id ASC"
        );

        let rows: Vec<AttachmentRow> = sqlx::query_as(&query)
            .bind(case_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(attachment_from_row).collect()
    }

    #[instrument(skip(self), fields(backend = "postgres"))]
    async fn update_status(&self, id: CaseId, status: CaseStatus) -> Result<Case, RepoError> {
        let table = self.config.cases_table();
        let query = format!(
            "UPDATE {table} SET status = $2, updated_at = GREATEST(NOW(), created_at) \
             WHERE id = $1 RETURNING {CASE_COLUMNS}"
        );

        let row: Option<CaseRow> = sqlx::query_as(&query)
            .bind(id.as_uuid())
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map_or(Err(RepoError::CaseNotFound(id)), case_from_row)
    }

    async fn health_check(&self) -> Result<(), RepoError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}


#[cfg(all(test, feature = "integration"))]
mod integration_tests {
    use super::*;

    fn test_config() -> PostgresConfig {
        PostgresConfig {
            url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/lexcase_test".to_string()),
            table_prefix: format!("test_{}_", Uuid::new_v4().simple()),
            ..PostgresConfig::default()
        }
    }

    #[tokio::test]
    async fn repository_conformance() {
        let repo = PostgresCaseRepository::new(test_config())
            .await
            .expect("pool creation should succeed");
        lexcase_repo::testing::run_repository_conformance_tests(&repo, "postgres")
            .await
            .expect("conformance tests should pass");
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let config = test_config();
        let repo = PostgresCaseRepository::new(config.clone())
            .await
            .expect("pool creation should succeed");
        run_migrations_again(&repo.pool, &config).await;
    }

    async fn run_migrations_again(pool: &PgPool, config: &PostgresConfig) {
        migrations::run_migrations(pool, config)
            .await
            .expect("second migration run should succeed");
    }
}
