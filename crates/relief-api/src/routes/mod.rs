//! # API Route Modules
//!
//! Back-office routes, all behind the admin gate:
//!
//! - `volunteers`: volunteer CRUD.
//! - `crises`: crisis CRUD.
//! - `reports`: daily donation/expense totals and spreadsheet exports.

pub mod crises;
pub mod reports;
pub mod volunteers;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Confirmation body returned by delete endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageBody {
    /// Human-readable confirmation.
    pub message: String,
}

impl MessageBody {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
