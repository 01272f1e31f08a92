//! # Crises API
//!
//! CRUD over reported crises. Same surface as the volunteers API:
//! list, create (201), partial update and delete, 404 on unknown ids.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use relief_core::{Crisis, CrisisPatch, NewCrisis};

use super::MessageBody;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, record_id};
use crate::state::AppState;

const LABEL: &str = "Crisis";

fn not_found() -> AppError {
    AppError::NotFound(format!("{LABEL} not found"))
}

/// Build the crises router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/crises", get(list_crises).post(create_crisis))
        .route("/crises/:id", put(update_crisis).delete(delete_crisis))
}

/// GET /crises: List all crises.
#[utoipa::path(
    get,
    path = "/crises",
    responses(
        (status = 200, description = "All crises", body = [Crisis]),
        (status = 500, description = "Store failure", body = crate::error::ErrorBody),
    ),
    tag = "crises"
)]
pub async fn list_crises(State(state): State<AppState>) -> Result<Json<Vec<Crisis>>, AppError> {
    Ok(Json(state.crises.list().await?))
}

/// POST /crises: Report a crisis.
#[utoipa::path(
    post,
    path = "/crises",
    request_body = NewCrisis,
    responses(
        (status = 201, description = "Crisis created", body = Crisis),
        (status = 500, description = "Invalid payload or store failure", body = crate::error::ErrorBody),
    ),
    tag = "crises"
)]
pub async fn create_crisis(
    State(state): State<AppState>,
    body: Result<Json<NewCrisis>, JsonRejection>,
) -> Result<(StatusCode, Json<Crisis>), AppError> {
    let req = extract_validated_json(body)?;
    let record = state.crises.insert(req.into_record()).await?;
    tracing::info!(crisis_id = %record.id, severity = %record.severity, "crisis created");
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /crises/:id: Overwrite the supplied fields.
#[utoipa::path(
    put,
    path = "/crises/{id}",
    params(("id" = String, Path, description = "Crisis id")),
    request_body = CrisisPatch,
    responses(
        (status = 200, description = "Crisis updated", body = Crisis),
        (status = 404, description = "Crisis not found", body = crate::error::ErrorBody),
    ),
    tag = "crises"
)]
pub async fn update_crisis(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<CrisisPatch>, JsonRejection>,
) -> Result<Json<Crisis>, AppError> {
    let id = record_id(&id, LABEL)?;
    let patch = extract_validated_json(body)?;
    let record = state.crises.update(id, patch).await?.ok_or_else(not_found)?;
    tracing::info!(crisis_id = %id, "crisis updated");
    Ok(Json(record))
}

/// DELETE /crises/:id: Remove a crisis.
#[utoipa::path(
    delete,
    path = "/crises/{id}",
    params(("id" = String, Path, description = "Crisis id")),
    responses(
        (status = 200, description = "Crisis deleted", body = MessageBody),
        (status = 404, description = "Crisis not found", body = crate::error::ErrorBody),
    ),
    tag = "crises"
)]
pub async fn delete_crisis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, AppError> {
    let id = record_id(&id, LABEL)?;
    state.crises.remove(id).await?.ok_or_else(not_found)?;
    tracing::info!(crisis_id = %id, "crisis deleted");
    Ok(Json(MessageBody::new(format!("{LABEL} deleted"))))
}
