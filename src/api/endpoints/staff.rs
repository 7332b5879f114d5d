//! Staff dashboard endpoints. Every route here sits behind `require_staff`.
//!
//! Handlers that write to the record store run on the blocking pool.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{list_limit, ApiContext, StaffContext};
use crate::core_state::CoreState;
use crate::education::{MaterialKey, PushContext};
use crate::models::{Alert, AlertStatus, Intervention, InterventionDraft, MaterialPush, Patient, PatientProfile};
use crate::store::{PatientSummary, Statistics, StoreError};

#[derive(Deserialize)]
pub struct SurgeryRequest {
    #[serde(default)]
    pub surgery: String,
    pub surgery_date: NaiveDate,
}

#[derive(Deserialize)]
pub struct AlertQuery {
    #[serde(default)]
    pub pending: bool,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct AlertUpdateRequest {
    pub status: AlertStatus,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct InterventionRequest {
    pub patient_id: String,
    #[serde(flatten)]
    pub draft: InterventionDraft,
}

#[derive(Deserialize)]
pub struct InterventionQuery {
    pub patient_id: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct ManualPushRequest {
    pub patient_id: String,
    pub material_id: MaterialKey,
}

#[derive(Deserialize)]
pub struct AutoPushRequest {
    pub patient_id: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub treatment: Option<String>,
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn require_patient(core: &CoreState, patient_id: &str) -> Result<Patient, StoreError> {
    core.store()
        .patient(patient_id)?
        .ok_or_else(|| StoreError::PatientNotFound(patient_id.to_string()))
}

/// `GET /api/staff/patients`
pub async fn patients(State(ctx): State<ApiContext>) -> Result<Json<Vec<PatientSummary>>, ApiError> {
    Ok(Json(ctx.core.store().all_patients()?))
}

/// `PUT /api/staff/patients/:id/surgery`: completes a self-registration.
pub async fn setup_surgery(
    State(ctx): State<ApiContext>,
    Extension(staff): Extension<StaffContext>,
    Path(patient_id): Path<String>,
    Json(req): Json<SurgeryRequest>,
) -> Result<Json<PatientProfile>, ApiError> {
    let patient = ctx
        .blocking(move |core| {
            core.store()
                .setup_surgery(&patient_id, &req.surgery, req.surgery_date)
        })
        .await?;
    tracing::info!(patient_id = %patient.id, staff = %staff.username, "Surgery details set");
    Ok(Json(patient.profile(today())))
}

/// `GET /api/staff/alerts?pending=true&limit=N`
///
/// Pending alerts come red first; the full list is newest first.
pub async fn alerts(
    State(ctx): State<ApiContext>,
    Query(query): Query<AlertQuery>,
) -> Result<Json<Vec<Alert>>, ApiError> {
    let store = ctx.core.store();
    let limit = list_limit(query.limit);
    let alerts = if query.pending {
        let mut pending = store.pending_alerts()?;
        pending.truncate(limit);
        pending
    } else {
        store.all_alerts(limit)?
    };
    Ok(Json(alerts))
}

/// `PATCH /api/staff/alerts/:id`: handled by the requesting staff user.
pub async fn update_alert(
    State(ctx): State<ApiContext>,
    Extension(staff): Extension<StaffContext>,
    Path(alert_id): Path<String>,
    Json(req): Json<AlertUpdateRequest>,
) -> Result<Json<Alert>, ApiError> {
    let alert = ctx
        .blocking(move |core| {
            core.store().update_alert_status(
                &alert_id,
                req.status,
                &staff.username,
                req.notes.as_deref(),
            )
        })
        .await?;
    Ok(Json(alert))
}

/// `POST /api/staff/interventions`: the nurse is the requesting staff user.
pub async fn create_intervention(
    State(ctx): State<ApiContext>,
    Extension(staff): Extension<StaffContext>,
    Json(req): Json<InterventionRequest>,
) -> Result<(StatusCode, Json<Intervention>), ApiError> {
    if req.draft.content.trim().is_empty() {
        return Err(ApiError::BadRequest("Intervention content is required".into()));
    }
    let draft = InterventionDraft {
        nurse: staff.username,
        ..req.draft
    };
    let patient_id = req.patient_id;
    let intervention = ctx
        .blocking(move |core| -> Result<Intervention, StoreError> {
            require_patient(core, &patient_id)?;
            core.store().save_intervention(&patient_id, draft)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(intervention)))
}

/// `GET /api/staff/interventions?patient_id=P&limit=N`
pub async fn interventions(
    State(ctx): State<ApiContext>,
    Query(query): Query<InterventionQuery>,
) -> Result<Json<Vec<Intervention>>, ApiError> {
    let list = ctx
        .core
        .store()
        .interventions(query.patient_id.as_deref(), list_limit(query.limit))?;
    Ok(Json(list))
}

/// `GET /api/staff/statistics`
pub async fn statistics(State(ctx): State<ApiContext>) -> Result<Json<Statistics>, ApiError> {
    Ok(Json(ctx.core.store().statistics()?))
}

/// `POST /api/staff/pushes`: manual handout push.
pub async fn push_material(
    State(ctx): State<ApiContext>,
    Extension(staff): Extension<StaffContext>,
    Json(req): Json<ManualPushRequest>,
) -> Result<(StatusCode, Json<MaterialPush>), ApiError> {
    let push = ctx
        .blocking(move |core| -> Result<MaterialPush, StoreError> {
            require_patient(core, &req.patient_id)?;
            core.store()
                .push_material(&req.patient_id, req.material_id, &staff.username)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(push)))
}

/// `POST /api/staff/pushes/auto`: run the auto-push rules for one patient.
///
/// The post-operative day comes from the patient's surgery date.
pub async fn auto_push(
    State(ctx): State<ApiContext>,
    Json(req): Json<AutoPushRequest>,
) -> Result<Json<Vec<MaterialPush>>, ApiError> {
    let pushed = ctx
        .blocking(move |core| -> Result<Vec<MaterialPush>, StoreError> {
            let patient = require_patient(core, &req.patient_id)?;
            let push_ctx = PushContext {
                post_op_day: patient.post_op_day(today()),
                symptoms: req.symptoms,
                treatment: req.treatment,
            };
            core.store().check_auto_push(&patient.id, &push_ctx)
        })
        .await?;
    Ok(Json(pushed))
}

/// `GET /api/staff/pushes`
pub async fn pushes(State(ctx): State<ApiContext>) -> Result<Json<Vec<MaterialPush>>, ApiError> {
    Ok(Json(ctx.core.store().all_pushes()?))
}
