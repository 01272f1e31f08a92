//! Volunteer persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `volunteers` table.
//! `age` is stored as `INTEGER`; a stored value outside `u16` surfaces as
//! [`StoreError::InvalidRow`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use relief_core::{Collection, Record, StoreError, Volunteer, VolunteerPatch};
use sqlx::PgPool;
use uuid::Uuid;

use super::{backend, PgStore};

const COLUMNS: &str = "id, name, age, mobile, assigned_task, created_at, updated_at";

/// Fetch every volunteer in insertion order.
pub async fn list(pool: &PgPool) -> Result<Vec<Volunteer>, StoreError> {
    let rows = sqlx::query_as::<_, VolunteerRow>(&format!(
        "SELECT {COLUMNS} FROM volunteers ORDER BY seq"
    ))
    .fetch_all(pool)
    .await
    .map_err(backend(Volunteer::COLLECTION))?;

    rows.into_iter().map(VolunteerRow::into_record).collect()
}

/// Insert a volunteer, replacing any row with the same id.
pub async fn upsert(pool: &PgPool, record: &Volunteer) -> Result<Volunteer, StoreError> {
    let row = sqlx::query_as::<_, VolunteerRow>(&format!(
        "INSERT INTO volunteers (id, name, age, mobile, assigned_task, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         ON CONFLICT (id) DO UPDATE SET
            name = EXCLUDED.name, age = EXCLUDED.age, mobile = EXCLUDED.mobile,
            assigned_task = EXCLUDED.assigned_task, updated_at = EXCLUDED.updated_at
         RETURNING {COLUMNS}"
    ))
    .bind(record.id)
    .bind(&record.name)
    .bind(i32::from(record.age))
    .bind(&record.mobile)
    .bind(&record.assigned_task)
    .bind(record.created_at)
    .bind(record.updated_at)
    .fetch_one(pool)
    .await
    .map_err(backend(Volunteer::COLLECTION))?;

    row.into_record()
}

/// Overwrite the fields present in `patch`. `None` if no row has `id`.
///
/// `assigned_task` is written whenever the key was present, so an explicit
/// `null` clears the column.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    patch: &VolunteerPatch,
) -> Result<Option<Volunteer>, StoreError> {
    let row = sqlx::query_as::<_, VolunteerRow>(&format!(
        "UPDATE volunteers SET
            name = COALESCE($2, name),
            age = COALESCE($3, age),
            mobile = COALESCE($4, mobile),
            assigned_task = CASE WHEN $5 THEN $6 ELSE assigned_task END,
            updated_at = $7
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(&patch.name)
    .bind(patch.age.map(i32::from))
    .bind(&patch.mobile)
    .bind(patch.assigned_task.is_some())
    .bind(patch.assigned_task.clone().flatten())
    .bind(Utc::now())
    .fetch_optional(pool)
    .await
    .map_err(backend(Volunteer::COLLECTION))?;

    row.map(VolunteerRow::into_record).transpose()
}

/// Delete the volunteer with `id`, returning it.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Volunteer>, StoreError> {
    let row = sqlx::query_as::<_, VolunteerRow>(&format!(
        "DELETE FROM volunteers WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(backend(Volunteer::COLLECTION))?;

    row.map(VolunteerRow::into_record).transpose()
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct VolunteerRow {
    id: Uuid,
    name: String,
    age: i32,
    mobile: String,
    assigned_task: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl VolunteerRow {
    fn into_record(self) -> Result<Volunteer, StoreError> {
        let age = u16::try_from(self.age).map_err(|e| StoreError::InvalidRow {
            collection: Volunteer::COLLECTION,
            id: self.id,
            reason: format!("age {}: {e}", self.age),
        })?;
        Ok(Volunteer {
            id: self.id,
            name: self.name,
            age,
            mobile: self.mobile,
            assigned_task: self.assigned_task,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl Collection<Volunteer> for PgStore {
    async fn list(&self) -> Result<Vec<Volunteer>, StoreError> {
        list(self.pool()).await
    }

    async fn insert(&self, record: Volunteer) -> Result<Volunteer, StoreError> {
        upsert(self.pool(), &record).await
    }

    async fn update(
        &self,
        id: Uuid,
        patch: VolunteerPatch,
    ) -> Result<Option<Volunteer>, StoreError> {
        update(self.pool(), id, &patch).await
    }

    async fn remove(&self, id: Uuid) -> Result<Option<Volunteer>, StoreError> {
        delete(self.pool(), id).await
    }
}
