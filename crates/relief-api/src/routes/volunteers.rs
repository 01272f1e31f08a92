//! # Volunteers API
//!
//! - `GET /volunteers`: list volunteers
//! - `POST /volunteers`: register a volunteer
//! - `PUT /volunteers/:id`: partial update
//! - `DELETE /volunteers/:id`: remove a volunteer

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use relief_core::{NewVolunteer, Volunteer, VolunteerPatch};

use super::MessageBody;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, record_id};
use crate::state::AppState;

const LABEL: &str = "Volunteer";

fn not_found() -> AppError {
    AppError::NotFound(format!("{LABEL} not found"))
}

/// Build the volunteers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/volunteers", get(list_volunteers).post(create_volunteer))
        .route(
            "/volunteers/:id",
            put(update_volunteer).delete(delete_volunteer),
        )
}

/// GET /volunteers: List all volunteers.
#[utoipa::path(
    get,
    path = "/volunteers",
    responses(
        (status = 200, description = "All volunteers", body = [Volunteer]),
        (status = 500, description = "Store failure", body = crate::error::ErrorBody),
    ),
    tag = "volunteers"
)]
pub async fn list_volunteers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Volunteer>>, AppError> {
    Ok(Json(state.volunteers.list().await?))
}

/// POST /volunteers: Register a volunteer.
#[utoipa::path(
    post,
    path = "/volunteers",
    request_body = NewVolunteer,
    responses(
        (status = 201, description = "Volunteer created", body = Volunteer),
        (status = 500, description = "Invalid payload or store failure", body = crate::error::ErrorBody),
    ),
    tag = "volunteers"
)]
pub async fn create_volunteer(
    State(state): State<AppState>,
    body: Result<Json<NewVolunteer>, JsonRejection>,
) -> Result<(StatusCode, Json<Volunteer>), AppError> {
    let req = extract_validated_json(body)?;
    let record = state.volunteers.insert(req.into_record()).await?;
    tracing::info!(volunteer_id = %record.id, "volunteer created");
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /volunteers/:id: Overwrite the supplied fields.
#[utoipa::path(
    put,
    path = "/volunteers/{id}",
    params(("id" = String, Path, description = "Volunteer id")),
    request_body = VolunteerPatch,
    responses(
        (status = 200, description = "Volunteer updated", body = Volunteer),
        (status = 404, description = "Volunteer not found", body = crate::error::ErrorBody),
    ),
    tag = "volunteers"
)]
pub async fn update_volunteer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<VolunteerPatch>, JsonRejection>,
) -> Result<Json<Volunteer>, AppError> {
    let id = record_id(&id, LABEL)?;
    let patch = extract_validated_json(body)?;
    let record = state
        .volunteers
        .update(id, patch)
        .await?
        .ok_or_else(not_found)?;
    tracing::info!(volunteer_id = %id, "volunteer updated");
    Ok(Json(record))
}

/// DELETE /volunteers/:id: Remove a volunteer.
#[utoipa::path(
    delete,
    path = "/volunteers/{id}",
    params(("id" = String, Path, description = "Volunteer id")),
    responses(
        (status = 200, description = "Volunteer deleted", body = MessageBody),
        (status = 404, description = "Volunteer not found", body = crate::error::ErrorBody),
    ),
    tag = "volunteers"
)]
pub async fn delete_volunteer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, AppError> {
    let id = record_id(&id, LABEL)?;
    state.volunteers.remove(id).await?.ok_or_else(not_found)?;
    tracing::info!(volunteer_id = %id, "volunteer deleted");
    Ok(Json(MessageBody::new(format!("{LABEL} deleted"))))
}
