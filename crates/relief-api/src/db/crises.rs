//! Crisis persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `crises` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use relief_core::{Collection, Crisis, CrisisPatch, Record, StoreError};
use sqlx::PgPool;
use uuid::Uuid;

use super::{backend, PgStore};

const COLUMNS: &str = "id, title, description, severity, location, created_at, updated_at";

/// Fetch every crisis in insertion order.
pub async fn list(pool: &PgPool) -> Result<Vec<Crisis>, StoreError> {
    let rows = sqlx::query_as::<_, CrisisRow>(&format!(
        "SELECT {COLUMNS} FROM crises ORDER BY seq"
    ))
    .fetch_all(pool)
    .await
    .map_err(backend(Crisis::COLLECTION))?;

    Ok(rows.into_iter().map(CrisisRow::into_record).collect())
}

/// Insert a crisis, replacing any row with the same id.
pub async fn upsert(pool: &PgPool, record: &Crisis) -> Result<Crisis, StoreError> {
    let row = sqlx::query_as::<_, CrisisRow>(&format!(
        "INSERT INTO crises (id, title, description, severity, location, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         ON CONFLICT (id) DO UPDATE SET
            title = EXCLUDED.title, description = EXCLUDED.description,
            severity = EXCLUDED.severity, location = EXCLUDED.location,
            updated_at = EXCLUDED.updated_at
         RETURNING {COLUMNS}"
    ))
    .bind(record.id)
    .bind(&record.title)
    .bind(&record.description)
    .bind(&record.severity)
    .bind(&record.location)
    .bind(record.created_at)
    .bind(record.updated_at)
    .fetch_one(pool)
    .await
    .map_err(backend(Crisis::COLLECTION))?;

    Ok(row.into_record())
}

/// Overwrite the fields present in `patch`. `None` if no row has `id`.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    patch: &CrisisPatch,
) -> Result<Option<Crisis>, StoreError> {
    let row = sqlx::query_as::<_, CrisisRow>(&format!(
        "UPDATE crises SET
            title = COALESCE($2, title),
            description = COALESCE($3, description),
            severity = COALESCE($4, severity),
            location = COALESCE($5, location),
            updated_at = $6
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(&patch.title)
    .bind(&patch.description)
    .bind(&patch.severity)
    .bind(&patch.location)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await
    .map_err(backend(Crisis::COLLECTION))?;

    Ok(row.map(CrisisRow::into_record))
}

/// Delete the crisis with `id`, returning it.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Crisis>, StoreError> {
    let row = sqlx::query_as::<_, CrisisRow>(&format!(
        "DELETE FROM crises WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(backend(Crisis::COLLECTION))?;

    Ok(row.map(CrisisRow::into_record))
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct CrisisRow {
    id: Uuid,
    title: String,
    description: String,
    severity: String,
    location: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CrisisRow {
    fn into_record(self) -> Crisis {
        Crisis {
            id: self.id,
            title: self.title,
            description: self.description,
            severity: self.severity,
            location: self.location,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[async_trait]
impl Collection<Crisis> for PgStore {
    async fn list(&self) -> Result<Vec<Crisis>, StoreError> {
        list(self.pool()).await
    }

    async fn insert(&self, record: Crisis) -> Result<Crisis, StoreError> {
        upsert(self.pool(), &record).await
    }

    async fn update(&self, id: Uuid, patch: CrisisPatch) -> Result<Option<Crisis>, StoreError> {
        update(self.pool(), id, &patch).await
    }

    async fn remove(&self, id: Uuid) -> Result<Option<Crisis>, StoreError> {
        delete(self.pool(), id).await
    }
}
