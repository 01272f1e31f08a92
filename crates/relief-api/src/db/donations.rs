//! Donation ledger persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `donations` table.
//! Entries are written by upstream intake, never updated through the API.

use std::convert::Infallible;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use relief_core::{Collection, Donation, Record, StoreError};
use sqlx::PgPool;
use uuid::Uuid;

use super::{backend, PgStore};

/// Fetch every entry in insertion order.
pub async fn list(pool: &PgPool) -> Result<Vec<Donation>, StoreError> {
    let rows = sqlx::query_as::<_, DonationRow>(
        "SELECT id, date, amount, donor FROM donations ORDER BY seq",
    )
    .fetch_all(pool)
    .await
    .map_err(backend(Donation::COLLECTION))?;

    Ok(rows.into_iter().map(DonationRow::into_record).collect())
}

/// Insert an entry, replacing any row with the same id.
pub async fn upsert(pool: &PgPool, record: &Donation) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO donations (id, date, amount, donor) VALUES ($1, $2, $3, $4)
         ON CONFLICT (id) DO UPDATE SET
            date = EXCLUDED.date, amount = EXCLUDED.amount, donor = EXCLUDED.donor",
    )
    .bind(record.id)
    .bind(record.date)
    .bind(record.amount)
    .bind(&record.donor)
    .execute(pool)
    .await
    .map_err(backend(Donation::COLLECTION))?;

    Ok(())
}

/// Delete the entry with `id`, returning it.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Donation>, StoreError> {
    let row = sqlx::query_as::<_, DonationRow>(
        "DELETE FROM donations WHERE id = $1 RETURNING id, date, amount, donor",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(backend(Donation::COLLECTION))?;

    Ok(row.map(DonationRow::into_record))
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct DonationRow {
    id: Uuid,
    date: DateTime<Utc>,
    amount: f64,
    donor: String,
}

impl DonationRow {
    fn into_record(self) -> Donation {
        Donation {
            id: self.id,
            date: self.date,
            amount: self.amount,
            donor: self.donor,
        }
    }
}

#[async_trait]
impl Collection<Donation> for PgStore {
    async fn list(&self) -> Result<Vec<Donation>, StoreError> {
        list(self.pool()).await
    }

    async fn insert(&self, record: Donation) -> Result<Donation, StoreError> {
        upsert(self.pool(), &record).await?;
        Ok(record)
    }

    async fn update(&self, _id: Uuid, patch: Infallible) -> Result<Option<Donation>, StoreError> {
        match patch {}
    }

    async fn remove(&self, id: Uuid) -> Result<Option<Donation>, StoreError> {
        delete(self.pool(), id).await
    }
}
