//! Patient account and record endpoints.
//!
//! - `POST /api/patients/register`
//! - `POST /api/patients/login`
//!
//! Behind `require_patient`, for the caller's own id only:
//! - `GET /api/patients/:id/reports`
//! - `GET /api/patients/:id/pushes`
//! - `POST /api/patients/:id/pushes/:push_id/read`

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{list_limit, ApiContext, PatientContext};
use crate::models::{MaterialPush, PatientProfile, SymptomReport};
use crate::store::{LoginResult, Registration, StoreError};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// `POST /api/patients/register`: self-registration, pending staff setup.
pub async fn register(
    State(ctx): State<ApiContext>,
    Json(form): Json<Registration>,
) -> Result<(StatusCode, Json<PatientProfile>), ApiError> {
    let patient = ctx
        .blocking(move |core| core.store().register_patient(form))
        .await?;
    let today = chrono::Local::now().date_naive();
    Ok((StatusCode::CREATED, Json(patient.profile(today))))
}

/// `POST /api/patients/login`
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResult>, ApiError> {
    let phone = req.phone.trim();
    if phone.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest("Phone and password are required".into()));
    }
    Ok(Json(ctx.core.store().login(phone, &req.password)?))
}

/// `GET /api/patients/:id/reports?limit=N`: newest first.
pub async fn reports(
    State(ctx): State<ApiContext>,
    Extension(patient): Extension<PatientContext>,
    Path(patient_id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<SymptomReport>>, ApiError> {
    patient.ensure_self(&patient_id)?;
    let reports = ctx
        .core
        .store()
        .patient_reports(&patient_id, list_limit(query.limit))?;
    Ok(Json(reports))
}

/// `GET /api/patients/:id/pushes`: handouts sent to this patient.
pub async fn pushes(
    State(ctx): State<ApiContext>,
    Extension(patient): Extension<PatientContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<MaterialPush>>, ApiError> {
    patient.ensure_self(&patient_id)?;
    Ok(Json(ctx.core.store().patient_pushes(&patient_id)?))
}

/// `POST /api/patients/:id/pushes/:push_id/read`
///
/// A push addressed to someone else is reported as not found.
pub async fn mark_read(
    State(ctx): State<ApiContext>,
    Extension(patient): Extension<PatientContext>,
    Path((patient_id, push_id)): Path<(String, String)>,
) -> Result<Json<MaterialPush>, ApiError> {
    patient.ensure_self(&patient_id)?;
    let push = ctx
        .blocking(move |core| -> Result<MaterialPush, StoreError> {
            let store = core.store();
            let owned = store
                .patient_pushes(&patient_id)?
                .iter()
                .any(|p| p.id == push_id);
            if !owned {
                return Err(StoreError::PushNotFound(push_id));
            }
            store.mark_as_read(&push_id)
        })
        .await?;
    Ok(Json(push))
}
