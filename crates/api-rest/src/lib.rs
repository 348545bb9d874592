//! # API REST
//!
//! REST API implementation for the patient registry.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, status codes, CORS, request tracing)
//!
//! Uses `api-shared` for wire types and `patreg-core` for everything else.

#![warn(rust_2018_idioms)]

mod error;

pub use error::{ApiError, ApiResult};

use api_shared::{dto, HealthService};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use patreg_core::{DemographicsDraft, PatientDraft, PatientService, ShardableUuid};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state for the REST API server
///
/// Shared by every handler. The service is cheap to clone; clones share one store.
#[derive(Clone)]
struct AppState {
    patients: PatientService,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_patients,
        get_patient,
        register_patient,
        update_patient,
        delete_patient,
    ),
    components(schemas(
        dto::HealthRes,
        dto::Patient,
        dto::CreatePatientReq,
        dto::UpdatePatientReq,
        dto::ErrorRes,
        patreg_core::Diagnosis,
    ))
)]
pub struct ApiDoc;

/// Builds the full application router over `patients`.
///
/// Includes the Swagger UI at `/swagger-ui` and the OpenAPI document at
/// `/api-docs/openapi.json`.
pub fn router(patients: PatientService) -> Router {
    let state = AppState { patients };

    Router::new()
        .route("/health", get(health))
        .route("/patients", get(list_patients).post(register_patient))
        .route(
            "/patients/:id",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn parse_id(raw: &str) -> ApiResult<ShardableUuid> {
    ShardableUuid::parse(raw).map_err(|_| ApiError::UnknownId(raw.to_string()))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = dto::HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health() -> Json<dto::HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "All registered patients", body = [dto::Patient]),
        (status = 500, description = "Internal server error", body = dto::ErrorRes)
    )
)]
/// List all patients in the registry
#[axum::debug_handler]
async fn list_patients(State(state): State<AppState>) -> ApiResult<Json<Vec<dto::Patient>>> {
    let patients = state.patients.list().await?;
    Ok(Json(patients.into_iter().map(dto::Patient::from).collect()))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "The patient", body = dto::Patient),
        (status = 404, description = "No such patient", body = dto::ErrorRes)
    )
)]
#[axum::debug_handler]
async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<dto::Patient>> {
    let id = parse_id(&id)?;
    let record = state.patients.get(&id).await?;
    Ok(Json(record.into()))
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = dto::CreatePatientReq,
    responses(
        (status = 201, description = "Patient registered", body = dto::Patient),
        (status = 400, description = "Validation failed", body = dto::ErrorRes),
        (status = 500, description = "Internal server error", body = dto::ErrorRes)
    )
)]
/// Register a new patient
///
/// The attending physician and department are derived from `admittingDiagnosis`; any values a
/// client sends for them are ignored. The response carries a `Location` header pointing at the
/// new record.
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - the body is not valid JSON or names an unknown diagnosis,
/// - any demographic field fails validation (all failures are listed under `errors`).
#[axum::debug_handler]
async fn register_patient(
    State(state): State<AppState>,
    payload: Result<Json<dto::CreatePatientReq>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    let record = state.patients.register(PatientDraft::from(req)).await?;
    let location = format!("/patients/{}", record.id());

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(dto::Patient::from(record)),
    ))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient identifier")),
    request_body = dto::UpdatePatientReq,
    responses(
        (status = 200, description = "Demographics updated", body = dto::Patient),
        (status = 400, description = "Validation failed", body = dto::ErrorRes),
        (status = 404, description = "No such patient", body = dto::ErrorRes)
    )
)]
/// Replace a patient's demographics
///
/// Only name, medical record number, age, gender and contacts can change. Diagnosis, physician
/// and department in the body are ignored.
#[axum::debug_handler]
async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<dto::UpdatePatientReq>, JsonRejection>,
) -> ApiResult<Json<dto::Patient>> {
    let id = parse_id(&id)?;
    let Json(req) = payload?;
    let record = state
        .patients
        .update_demographics(&id, DemographicsDraft::from(req))
        .await?;
    Ok(Json(record.into()))
}

#[utoipa::path(
    delete,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient identifier")),
    responses(
        (status = 204, description = "Patient deleted"),
        (status = 400, description = "Diagnosis set and not Unspecified", body = dto::ErrorRes),
        (status = 404, description = "No such patient", body = dto::ErrorRes)
    )
)]
#[axum::debug_handler]
async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    state.patients.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
