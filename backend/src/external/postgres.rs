//! PostgreSQL-backed dataset store
//!
//! Records of a version are stored as one JSONB array next to the version
//! metadata; see `migrations/0001_dataset_versions.sql`.

use chrono::{DateTime, Utc};
use shared::{DatasetVersion, ItemRecord, StoredDataset};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::warehouse::{
    active_version_conflict, company_not_found, version_not_found, DatasetStore, NewDataset,
};
use crate::error::AppResult;

const VERSION_COLUMNS: &str = "id, company, version_number, is_active, source_file, description, \
     created_by, row_count, checksum, uploaded_at";

#[derive(Debug, sqlx::FromRow)]
struct VersionRow {
    id: Uuid,
    company: String,
    version_number: i64,
    is_active: bool,
    source_file: Option<String>,
    description: Option<String>,
    created_by: Option<String>,
    row_count: i64,
    checksum: Option<String>,
    uploaded_at: DateTime<Utc>,
}

impl From<VersionRow> for DatasetVersion {
    fn from(row: VersionRow) -> Self {
        DatasetVersion {
            id: row.id,
            company: row.company,
            version_number: row.version_number,
            is_active: row.is_active,
            source_file: row.source_file,
            description: row.description,
            created_by: row.created_by,
            row_count: row.row_count,
            checksum: row.checksum,
            uploaded_at: row.uploaded_at,
        }
    }
}

/// Dataset store on a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[axum::async_trait]
impl DatasetStore for PgStore {
    async fn store(&self, dataset: NewDataset) -> AppResult<DatasetVersion> {
        let mut tx = self.db.begin().await?;

        // Serialize version numbering per company
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&dataset.company)
            .execute(&mut *tx)
            .await?;

        let (next_version,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(MAX(version_number), 0) + 1 FROM dataset_versions WHERE company = $1",
        )
        .bind(&dataset.company)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE dataset_versions SET is_active = FALSE WHERE company = $1 AND is_active")
            .bind(&dataset.company)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, VersionRow>(&format!(
            r#"
            INSERT INTO dataset_versions
                (id, company, version_number, is_active, source_file, description,
                 created_by, row_count, checksum, records)
            VALUES ($1, $2, $3, TRUE, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            VERSION_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&dataset.company)
        .bind(next_version)
        .bind(&dataset.source_file)
        .bind(&dataset.description)
        .bind(&dataset.created_by)
        .bind(dataset.records.len() as i64)
        .bind(&dataset.checksum)
        .bind(Json(&dataset.records))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            company = %row.company,
            version = row.version_number,
            rows = row.row_count,
            "Stored dataset version"
        );
        Ok(row.into())
    }

    async fn fetch(&self, company: &str, version_number: Option<i64>) -> AppResult<StoredDataset> {
        #[derive(sqlx::FromRow)]
        struct DatasetRow {
            #[sqlx(flatten)]
            version: VersionRow,
            records: Json<Vec<ItemRecord>>,
        }

        let row = sqlx::query_as::<_, DatasetRow>(&format!(
            r#"
            SELECT {}, records
            FROM dataset_versions
            WHERE company = $1
              AND (($2::BIGINT IS NULL AND is_active) OR version_number = $2)
            ORDER BY version_number DESC
            LIMIT 1
            "#,
            VERSION_COLUMNS
        ))
        .bind(company)
        .bind(version_number)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| version_not_found(company, version_number))?;

        Ok(StoredDataset {
            version: row.version.into(),
            records: row.records.0,
        })
    }

    async fn list_versions(&self, company: &str, limit: i64) -> AppResult<Vec<DatasetVersion>> {
        let rows = sqlx::query_as::<_, VersionRow>(&format!(
            r#"
            SELECT {}
            FROM dataset_versions
            WHERE company = $1
            ORDER BY version_number DESC
            LIMIT $2
            "#,
            VERSION_COLUMNS
        ))
        .bind(company)
        .bind(limit.max(0))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn activate(&self, company: &str, version_number: i64) -> AppResult<DatasetVersion> {
        let mut tx = self.db.begin().await?;

        let exists: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM dataset_versions WHERE company = $1 AND version_number = $2",
        )
        .bind(company)
        .bind(version_number)
        .fetch_optional(&mut *tx)
        .await?;
        if exists.is_none() {
            return Err(version_not_found(company, Some(version_number)));
        }

        sqlx::query("UPDATE dataset_versions SET is_active = FALSE WHERE company = $1 AND is_active")
            .bind(company)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, VersionRow>(&format!(
            r#"
            UPDATE dataset_versions SET is_active = TRUE
            WHERE company = $1 AND version_number = $2
            RETURNING {}
            "#,
            VERSION_COLUMNS
        ))
        .bind(company)
        .bind(version_number)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    async fn delete_version(&self, company: &str, version_number: i64) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let active: Option<(bool,)> = sqlx::query_as(
            "SELECT is_active FROM dataset_versions WHERE company = $1 AND version_number = $2 FOR UPDATE",
        )
        .bind(company)
        .bind(version_number)
        .fetch_optional(&mut *tx)
        .await?;

        match active {
            None => return Err(version_not_found(company, Some(version_number))),
            Some((true,)) => return Err(active_version_conflict(company, version_number)),
            Some((false,)) => {}
        }

        sqlx::query("DELETE FROM dataset_versions WHERE company = $1 AND version_number = $2")
            .bind(company)
            .bind(version_number)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete_company(&self, company: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM dataset_versions WHERE company = $1")
            .bind(company)
            .execute(&self.db)
            .await?;

        match result.rows_affected() {
            0 => Err(company_not_found(company)),
            removed => Ok(removed),
        }
    }

    async fn status(&self) -> String {
        match sqlx::query("SELECT 1").execute(&self.db).await {
            Ok(_) => "connected".to_string(),
            Err(_) => "disconnected".to_string(),
        }
    }
}
