#![deny(missing_docs)]

//! # relief-core: Domain Types for the Relief Administration Back Office
//!
//! Everything the HTTP layer needs that is not HTTP: the four record
//! collections, payload validation, the record-store abstraction with its
//! in-memory backend, the daily aggregation behind `/reports`, and the
//! spreadsheet export behind `/reports/excel`.
//!
//! ## Design Principles
//!
//! 1. **Explicit payload structs.** Create and update bodies are distinct
//!    types per entity with `deny_unknown_fields`; business rules live in
//!    [`Validate`] impls so malformed data never reaches a store.
//!
//! 2. **The store is injected.** Handlers talk to [`Collection`] trait
//!    objects. [`MemoryCollection`] backs development and tests; the API
//!    crate provides a Postgres backend behind the same trait.
//!
//! 3. **Structured errors.** [`ValidationError`], [`StoreError`] and
//!    [`ExportError`] are `thiserror` enums. No `.unwrap()` outside tests.

pub mod error;
pub mod export;
pub mod model;
pub mod report;
pub mod store;
pub mod validation;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{ExportError, StoreError, ValidationError};
pub use export::{Cell, ExportKind, Sheet, Tabular};
pub use model::{
    Crisis, CrisisPatch, Donation, Expense, NewCrisis, NewVolunteer, Volunteer, VolunteerPatch,
};
pub use report::{daily_totals, ActivityReport, DailyTotal, Ledger};
pub use store::{Collection, MemoryCollection, Record};
pub use validation::Validate;
