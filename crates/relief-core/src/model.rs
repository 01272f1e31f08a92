//! # Record Types
//!
//! The four collections held by the record store. Volunteers and crises are
//! administered through the API; donations and expenses are ledgers that
//! the back office only reads, for aggregation and export.
//!
//! Every record carries a store-assigned UUID and no reference to any other
//! collection. JSON field names are camelCase (`assignedTask`, `createdAt`).

use std::convert::Infallible;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::store::Record;
use crate::validation::{in_range, non_empty, non_empty_if_present, Validate};

/// Inclusive upper bound accepted for a volunteer's age.
pub const MAX_VOLUNTEER_AGE: u16 = 150;

// -- Volunteers ---------------------------------------------------------------

/// A registered volunteer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    /// Store-assigned identity.
    pub id: Uuid,
    /// Full name.
    pub name: String,
    /// Age in years.
    pub age: u16,
    /// Contact number, stored as entered.
    pub mobile: String,
    /// Current assignment, if any.
    #[serde(default)]
    pub assigned_task: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /volunteers`.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewVolunteer {
    /// Full name.
    pub name: String,
    /// Age in years.
    pub age: u16,
    /// Contact number.
    pub mobile: String,
    /// Initial assignment.
    #[serde(default)]
    pub assigned_task: Option<String>,
}

impl Validate for NewVolunteer {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("name", &self.name)?;
        non_empty("mobile", &self.mobile)?;
        in_range("age", i64::from(self.age), 0, i64::from(MAX_VOLUNTEER_AGE))?;
        Ok(())
    }
}

impl NewVolunteer {
    /// Assign a fresh identity and timestamps.
    pub fn into_record(self) -> Volunteer {
        let now = Utc::now();
        Volunteer {
            id: Uuid::new_v4(),
            name: self.name,
            age: self.age,
            mobile: self.mobile,
            assigned_task: self.assigned_task,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body of `PUT /volunteers/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VolunteerPatch {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement age.
    pub age: Option<u16>,
    /// Replacement contact number.
    pub mobile: Option<String>,
    /// Replacement assignment. `null` clears it; an absent key keeps it.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub assigned_task: Option<Option<String>>,
}

/// Deserialize a key that is present, keeping an explicit `null` as
/// `Some(None)`. Absent keys fall back to `None` through `#[serde(default)]`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Validate for VolunteerPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty_if_present("name", self.name.as_deref())?;
        non_empty_if_present("mobile", self.mobile.as_deref())?;
        if let Some(age) = self.age {
            in_range("age", i64::from(age), 0, i64::from(MAX_VOLUNTEER_AGE))?;
        }
        Ok(())
    }
}

impl Record for Volunteer {
    type Patch = VolunteerPatch;
    const COLLECTION: &'static str = "volunteers";

    fn id(&self) -> Uuid {
        self.id
    }

    fn apply(&mut self, patch: VolunteerPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(age) = patch.age {
            self.age = age;
        }
        if let Some(mobile) = patch.mobile {
            self.mobile = mobile;
        }
        if let Some(task) = patch.assigned_task {
            self.assigned_task = task;
        }
        self.updated_at = Utc::now();
    }
}

// -- Crises -------------------------------------------------------------------

/// A reported crisis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Crisis {
    /// Store-assigned identity.
    pub id: Uuid,
    /// Short headline.
    pub title: String,
    /// Free-text account of the situation.
    pub description: String,
    /// Severity label as reported (e.g. "high").
    pub severity: String,
    /// Where the crisis is happening.
    pub location: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /crises`.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCrisis {
    /// Short headline.
    pub title: String,
    /// Free-text account of the situation.
    pub description: String,
    /// Severity label.
    pub severity: String,
    /// Where the crisis is happening.
    pub location: String,
}

impl Validate for NewCrisis {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("title", &self.title)?;
        non_empty("description", &self.description)?;
        non_empty("severity", &self.severity)?;
        non_empty("location", &self.location)?;
        Ok(())
    }
}

impl NewCrisis {
    /// Assign a fresh identity and timestamps.
    pub fn into_record(self) -> Crisis {
        let now = Utc::now();
        Crisis {
            id: Uuid::new_v4(),
            title: self.title,
            description: self.description,
            severity: self.severity,
            location: self.location,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body of `PUT /crises/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CrisisPatch {
    /// Replacement headline.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement severity label.
    pub severity: Option<String>,
    /// Replacement location.
    pub location: Option<String>,
}

impl Validate for CrisisPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty_if_present("title", self.title.as_deref())?;
        non_empty_if_present("description", self.description.as_deref())?;
        non_empty_if_present("severity", self.severity.as_deref())?;
        non_empty_if_present("location", self.location.as_deref())?;
        Ok(())
    }
}

impl Record for Crisis {
    type Patch = CrisisPatch;
    const COLLECTION: &'static str = "crises";

    fn id(&self) -> Uuid {
        self.id
    }

    fn apply(&mut self, patch: CrisisPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(severity) = patch.severity {
            self.severity = severity;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        self.updated_at = Utc::now();
    }
}

// -- Ledgers ------------------------------------------------------------------

/// A donation received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    /// Store-assigned identity.
    pub id: Uuid,
    /// When the donation was received.
    pub date: DateTime<Utc>,
    /// Amount donated.
    pub amount: f64,
    /// Who donated.
    pub donor: String,
}

impl Donation {
    /// Build a donation with a fresh identity.
    pub fn new(date: DateTime<Utc>, amount: f64, donor: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            amount,
            donor: donor.into(),
        }
    }
}

/// Donations are never edited through this service.
impl Record for Donation {
    type Patch = Infallible;
    const COLLECTION: &'static str = "donations";

    fn id(&self) -> Uuid {
        self.id
    }

    fn apply(&mut self, patch: Infallible) {
        match patch {}
    }
}

/// An expense paid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Store-assigned identity.
    pub id: Uuid,
    /// When the expense was paid.
    pub date: DateTime<Utc>,
    /// Amount paid.
    pub amount: f64,
    /// What the money was spent on.
    pub details: String,
}

impl Expense {
    /// Build an expense with a fresh identity.
    pub fn new(date: DateTime<Utc>, amount: f64, details: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            amount,
            details: details.into(),
        }
    }
}

/// Expenses are never edited through this service.
impl Record for Expense {
    type Patch = Infallible;
    const COLLECTION: &'static str = "expenses";

    fn id(&self) -> Uuid {
        self.id
    }

    fn apply(&mut self, patch: Infallible) {
        match patch {}
    }
}
