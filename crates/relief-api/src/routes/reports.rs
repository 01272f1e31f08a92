//! # Reports API
//!
//! - `GET /reports` returns daily donation and expense totals.
//! - `GET /reports/excel?type=<kind>` renders one collection as an `.xlsx`
//!   attachment.
//!
//! An export is rendered to a uniquely named file under the configured
//! reports directory, read back, and deleted before the response is sent.
//! The file is owned by a [`ReportFile`] guard inside the blocking task, so
//! it is removed on every path once its name has been chosen, including
//! render failures and client disconnects.

use std::path::{Path, PathBuf};

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use relief_core::export::{file_name, XLSX_CONTENT_TYPE};
use relief_core::{ActivityReport, ExportError, ExportKind, Sheet};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::extract_query;
use crate::state::AppState;

/// Query string of `GET /reports/excel`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    /// One of `donation`, `expense`, `volunteer`, `crisis`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Build the reports router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports", get(activity_report))
        .route("/reports/excel", get(export_report))
}

/// GET /reports: daily donation and expense totals.
#[utoipa::path(
    get,
    path = "/reports",
    responses(
        (status = 200, description = "Daily totals", body = ActivityReport),
        (status = 500, description = "Store failure", body = crate::error::ErrorBody),
    ),
    tag = "reports"
)]
pub async fn activity_report(
    State(state): State<AppState>,
) -> Result<Json<ActivityReport>, AppError> {
    let donations = state.donations.list().await?;
    let expenses = state.expenses.list().await?;
    Ok(Json(ActivityReport::build(&donations, &expenses)))
}

/// GET /reports/excel: spreadsheet export of one collection.
#[utoipa::path(
    get,
    path = "/reports/excel",
    params(ExportQuery),
    responses(
        (status = 200, description = "Workbook attachment (.xlsx)"),
        (status = 400, description = "Invalid report type", body = crate::error::ErrorBody),
        (status = 500, description = "Store, file-system or workbook failure", body = crate::error::ErrorBody),
    ),
    tag = "reports"
)]
pub async fn export_report(
    State(state): State<AppState>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let query = extract_query(query)?;
    let requested = query.kind.unwrap_or_default();
    let kind: ExportKind = requested.parse().map_err(|err: ExportError| {
        tracing::warn!(requested = %requested, "rejected export request");
        AppError::from(err)
    })?;

    let dir = &state.config.reports_dir;
    ensure_reports_dir(dir).await?;

    let name = file_name(kind, Utc::now(), Uuid::new_v4());
    let path = dir.join(&name);

    let sheet = match kind {
        ExportKind::Donation => Sheet::from_records(&state.donations.list().await?),
        ExportKind::Expense => Sheet::from_records(&state.expenses.list().await?),
        ExportKind::Volunteer => Sheet::from_records(&state.volunteers.list().await?),
        ExportKind::Crisis => Sheet::from_records(&state.crises.list().await?),
    };
    let rows = sheet.rows().len();

    let bytes = tokio::task::spawn_blocking(move || render(ReportFile::new(path), &sheet))
        .await
        .map_err(|e| AppError::Internal(format!("export task failed: {e}")))??;

    tracing::info!(kind = %kind, rows, file = %name, "report exported");

    let disposition = format!("attachment; filename=\"{name}\"");
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// Create the reports directory if missing.
async fn ensure_reports_dir(dir: &Path) -> Result<(), AppError> {
    if tokio::fs::metadata(dir).await.is_ok_and(|m| m.is_dir()) {
        tracing::debug!(dir = %dir.display(), "reports directory already exists");
        return Ok(());
    }
    tokio::fs::create_dir_all(dir).await?;
    tracing::info!(dir = %dir.display(), "created reports directory");
    Ok(())
}

/// Write the workbook to `file` and read it back for transfer.
///
/// The whole workbook is held in memory until the response is written, so
/// peak usage per request is one collection's export. Exports are not
/// streamed from disk because `file` is removed when this returns.
fn render(file: ReportFile, sheet: &Sheet) -> Result<Vec<u8>, ExportError> {
    sheet.write_xlsx(file.path())?;
    Ok(std::fs::read(file.path())?)
}

// -- Temporary File Guard -----------------------------------------------------

/// Deletes the export file at `path` when dropped.
///
/// A missing file is not an error. Any other removal failure is logged and
/// swallowed.
#[derive(Debug)]
pub(crate) struct ReportFile {
    path: PathBuf,
}

impl ReportFile {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ReportFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(file = %self.path.display(), "export file removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                file = %self.path.display(),
                error = %e,
                "failed to remove export file"
            ),
        }
    }
}
