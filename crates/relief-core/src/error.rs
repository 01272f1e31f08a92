//! # Error Hierarchy
//!
//! Structured error types for the back office, built with `thiserror`.
//! Each variant names the field, collection or file it concerns so the
//! API layer can pass the message through to operators unchanged.

use thiserror::Error;

/// A payload failed a business rule after deserialization succeeded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field was empty or whitespace.
    #[error("{field} must not be empty")]
    Empty {
        /// The offending field, as it appears in JSON.
        field: &'static str,
    },

    /// A numeric field fell outside its accepted range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// The offending field, as it appears in JSON.
        field: &'static str,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
        /// The rejected value.
        value: i64,
    },
}

/// The record store could not complete an operation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend rejected or failed the call (connection, query, constraint).
    #[error("{collection} store error: {message}")]
    Backend {
        /// Collection the call targeted.
        collection: &'static str,
        /// Backend-provided description.
        message: String,
    },

    /// A stored row could not be mapped back to a record.
    #[error("corrupt {collection} row {id}: {reason}")]
    InvalidRow {
        /// Collection the row belongs to.
        collection: &'static str,
        /// Identity of the row.
        id: uuid::Uuid,
        /// What did not map.
        reason: String,
    },
}

/// Export selection, rendering or file-system failure.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The requested export type is not one of the recognized kinds.
    #[error("unknown export type: {0}")]
    UnknownKind(String),

    /// The workbook writer failed.
    #[error("workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    /// The table has more rows than a worksheet can address.
    #[error("too many rows for one worksheet: {0}")]
    TooManyRows(usize),

    /// Reading or writing the report file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
