use sqlx::PgPool;

use lexcase_core::CaseStatus;

use crate::config::PostgresConfig;

/// Run database migrations, creating required tables if they do not exist.
///
/// Creates the cases and case attachments tables in the configured schema
/// with the configured table prefix. Attachments reference their case with a
/// foreign key, and each storage path may be registered only once.
///
/// # Errors
///
/// Returns a [`sqlx::Error`] if any DDL statement fails.
pub async fn run_migrations(pool: &PgPool, config: &PostgresConfig) -> Result<(), sqlx::Error> {
    let cases_table = config.cases_table();
    let attachments_table = config.attachments_table();
    let prefix = &config.table_prefix;

    let statuses = CaseStatus::ALL
        .iter()
        .map(|s| format!("'{}'", s.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    let create_cases = format!(
        "CREATE TABLE IF NOT EXISTS {cases_table} (
            id UUID PRIMARY KEY,
            user_id TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ({statuses})),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"
    );

    let create_cases_user_idx = format!(
        "CREATE INDEX IF NOT EXISTS {prefix}cases_user_created_idx \
         ON {cases_table} (user_id, created_at DESC)"
    );

    let create_attachments = format!(
        "CREATE TABLE IF NOT EXISTS {attachments_table} (
            id UUID PRIMARY KEY,
            case_id UUID NOT NULL REFERENCES {cases_table} (id) ON DELETE CASCADE,
            storage_bucket TEXT NOT NULL,
            storage_path TEXT NOT NULL UNIQUE,
            file_name TEXT NOT NULL,
            file_size BIGINT NOT NULL CHECK (file_size >= 0),
            mime_type TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"
    );

    let create_attachments_case_idx = format!(
        "CREATE INDEX IF NOT EXISTS {prefix}case_attachments_case_idx \
         ON {attachments_table} (case_id, created_at)"
    );

    sqlx::query(&create_cases).execute(pool).await?;
    sqlx::query(&create_cases_user_idx).execute(pool).await?;
    sqlx::query(&create_attachments).execute(pool).await?;
    sqlx::query(&create_attachments_case_idx)
        .execute(pool)
        .await?;

    Ok(())
}
