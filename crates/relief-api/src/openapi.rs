//! # OpenAPI Specification Assembly
//!
//! Collects the utoipa-documented admin routes into one document, served
//! without authentication at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Assembled OpenAPI document for the back-office surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Relief Admin API",
        version = "0.1.0",
        description = "Back office for disaster-relief operations: volunteers, crises, daily activity reports and spreadsheet exports.",
        license(name = "MIT")
    ),
    paths(
        crate::routes::volunteers::list_volunteers,
        crate::routes::volunteers::create_volunteer,
        crate::routes::volunteers::update_volunteer,
        crate::routes::volunteers::delete_volunteer,
        crate::routes::crises::list_crises,
        crate::routes::crises::create_crisis,
        crate::routes::crises::update_crisis,
        crate::routes::crises::delete_crisis,
        crate::routes::reports::activity_report,
        crate::routes::reports::export_report,
    ),
    components(schemas(
        relief_core::Volunteer,
        relief_core::NewVolunteer,
        relief_core::VolunteerPatch,
        relief_core::Crisis,
        relief_core::NewCrisis,
        relief_core::CrisisPatch,
        relief_core::ActivityReport,
        relief_core::DailyTotal,
        relief_core::ExportKind,
        crate::routes::MessageBody,
        crate::error::ErrorBody,
    )),
    modifiers(&BearerAuth),
    security(("bearer" = [])),
    tags(
        (name = "volunteers", description = "Volunteer management"),
        (name = "crises", description = "Crisis management"),
        (name = "reports", description = "Daily totals and spreadsheet exports"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` security scheme referenced by every path.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: the generated document.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
