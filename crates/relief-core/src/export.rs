//! # Spreadsheet Export
//!
//! Maps a collection onto a fixed column schema and renders it as an
//! `.xlsx` workbook with a single `Report` worksheet.
//!
//! | kind | columns |
//! |---|---|
//! | `donation` | Date, Amount, Donor |
//! | `expense` | Date, Amount, Details |
//! | `volunteer` | Name, Age, Mobile, Assigned Task |
//! | `crisis` | Title, Description, Severity, Location |

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ExportError;
use crate::model::{Crisis, Donation, Expense, Volunteer};
use crate::report::DAY_FORMAT;

/// Name of the single worksheet in every export.
pub const WORKSHEET_NAME: &str = "Report";

/// MIME type of the rendered workbook.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// The collections that can be exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    /// Donations ledger.
    Donation,
    /// Expenses ledger.
    Expense,
    /// Volunteer roster.
    Volunteer,
    /// Crisis register.
    Crisis,
}

impl ExportKind {
    /// Every kind, in documentation order.
    pub const ALL: [ExportKind; 4] = [
        Self::Donation,
        Self::Expense,
        Self::Volunteer,
        Self::Crisis,
    ];

    /// Query-string form of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Donation => "donation",
            Self::Expense => "expense",
            Self::Volunteer => "volunteer",
            Self::Crisis => "crisis",
        }
    }

    /// Header row, in column order.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::Donation => &["Date", "Amount", "Donor"],
            Self::Expense => &["Date", "Amount", "Details"],
            Self::Volunteer => &["Name", "Age", "Mobile", "Assigned Task"],
            Self::Crisis => &["Title", "Description", "Severity", "Location"],
        }
    }
}

impl std::fmt::Display for ExportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportKind {
    type Err = ExportError;

    /// Exact, case-sensitive match on the query-string form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ExportError::UnknownKind(s.to_string()))
    }
}

/// Build a per-request file name: `report_<UTC timestamp>_<nonce>.<kind>.xlsx`.
///
/// The nonce keeps concurrent exports of the same kind in the same
/// millisecond apart.
pub fn file_name(kind: ExportKind, at: DateTime<Utc>, nonce: Uuid) -> String {
    let nonce = nonce.simple().to_string();
    format!(
        "report_{}_{}.{}.xlsx",
        at.format("%Y%m%dT%H%M%S%.3fZ"),
        &nonce[..8],
        kind.as_str()
    )
}

/// A single worksheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Text value.
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Left blank.
    Empty,
}

/// A record that maps onto one export row.
pub trait Tabular {
    /// The export schema this record fills.
    const KIND: ExportKind;

    /// Cells in the order of [`ExportKind::columns`].
    fn cells(&self) -> Vec<Cell>;
}

fn day(date: &DateTime<Utc>) -> Cell {
    Cell::Text(date.format(DAY_FORMAT).to_string())
}

impl Tabular for Donation {
    const KIND: ExportKind = ExportKind::Donation;

    fn cells(&self) -> Vec<Cell> {
        vec![
            day(&self.date),
            Cell::Number(self.amount),
            Cell::Text(self.donor.clone()),
        ]
    }
}

impl Tabular for Expense {
    const KIND: ExportKind = ExportKind::Expense;

    fn cells(&self) -> Vec<Cell> {
        vec![
            day(&self.date),
            Cell::Number(self.amount),
            Cell::Text(self.details.clone()),
        ]
    }
}

impl Tabular for Volunteer {
    const KIND: ExportKind = ExportKind::Volunteer;

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Text(self.name.clone()),
            Cell::Number(f64::from(self.age)),
            Cell::Text(self.mobile.clone()),
            self.assigned_task
                .clone()
                .map_or(Cell::Empty, Cell::Text),
        ]
    }
}

impl Tabular for Crisis {
    const KIND: ExportKind = ExportKind::Crisis;

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Text(self.title.clone()),
            Cell::Text(self.description.clone()),
            Cell::Text(self.severity.clone()),
            Cell::Text(self.location.clone()),
        ]
    }
}

/// A header row plus one data row per exported record.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    kind: ExportKind,
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Tabulate `records` under their kind's column schema.
    pub fn from_records<T: Tabular>(records: &[T]) -> Self {
        Self {
            kind: T::KIND,
            rows: records.iter().map(Tabular::cells).collect(),
        }
    }

    /// The schema this sheet follows.
    pub fn kind(&self) -> ExportKind {
        self.kind
    }

    /// Header row.
    pub fn header(&self) -> &'static [&'static str] {
        self.kind.columns()
    }

    /// Data rows, excluding the header.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Render the sheet as an `.xlsx` workbook at `path`, replacing any
    /// existing file.
    pub fn write_xlsx(&self, path: &Path) -> Result<(), ExportError> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(WORKSHEET_NAME)?;

        for (col, title) in self.header().iter().enumerate() {
            worksheet.write_string_with_format(0, column(col), *title, &bold)?;
        }

        for (index, cells) in self.rows.iter().enumerate() {
            let row = u32::try_from(index + 1).map_err(|_| ExportError::TooManyRows(index))?;
            for (col, cell) in cells.iter().enumerate() {
                match cell {
                    Cell::Text(text) => {
                        worksheet.write_string(row, column(col), text.as_str())?;
                    }
                    Cell::Number(n) => {
                        worksheet.write_number(row, column(col), *n)?;
                    }
                    Cell::Empty => {}
                }
            }
        }
        worksheet.autofit();

        workbook.save(path)?;
        Ok(())
    }
}

/// Column schemas are at most four wide.
fn column(index: usize) -> u16 {
    index as u16
}
