//! Expense ledger persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `expenses` table.
//! Entries are written by upstream intake, never updated through the API.

use std::convert::Infallible;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use relief_core::{Collection, Expense, Record, StoreError};
use sqlx::PgPool;
use uuid::Uuid;

use super::{backend, PgStore};

/// Fetch every entry in insertion order.
pub async fn list(pool: &PgPool) -> Result<Vec<Expense>, StoreError> {
    let rows = sqlx::query_as::<_, ExpenseRow>(
        "SELECT id, date, amount, details FROM expenses ORDER BY seq",
    )
    .fetch_all(pool)
    .await
    .map_err(backend(Expense::COLLECTION))?;

    Ok(rows.into_iter().map(ExpenseRow::into_record).collect())
}

/// Insert an entry, replacing any row with the same id.
pub async fn upsert(pool: &PgPool, record: &Expense) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO expenses (id, date, amount, details) VALUES ($1, $2, $3, $4)
         ON CONFLICT (id) DO UPDATE SET
            date = EXCLUDED.date, amount = EXCLUDED.amount, details = EXCLUDED.details",
    )
    .bind(record.id)
    .bind(record.date)
    .bind(record.amount)
    .bind(&record.details)
    .execute(pool)
    .await
    .map_err(backend(Expense::COLLECTION))?;

    Ok(())
}

/// Delete the entry with `id`, returning it.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Expense>, StoreError> {
    let row = sqlx::query_as::<_, ExpenseRow>(
        "DELETE FROM expenses WHERE id = $1 RETURNING id, date, amount, details",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(backend(Expense::COLLECTION))?;

    Ok(row.map(ExpenseRow::into_record))
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct ExpenseRow {
    id: Uuid,
    date: DateTime<Utc>,
    amount: f64,
    details: String,
}

impl ExpenseRow {
    fn into_record(self) -> Expense {
        Expense {
            id: self.id,
            date: self.date,
            amount: self.amount,
            details: self.details,
        }
    }
}

#[async_trait]
impl Collection<Expense> for PgStore {
    async fn list(&self) -> Result<Vec<Expense>, StoreError> {
        list(self.pool()).await
    }

    async fn insert(&self, record: Expense) -> Result<Expense, StoreError> {
        upsert(self.pool(), &record).await?;
        Ok(record)
    }

    async fn update(&self, _id: Uuid, patch: Infallible) -> Result<Option<Expense>, StoreError> {
        match patch {}
    }

    async fn remove(&self, id: Uuid) -> Result<Option<Expense>, StoreError> {
        delete(self.pool(), id).await
    }
}
