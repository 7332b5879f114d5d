//! Symptom-report chat endpoints, all behind `require_patient`.
//!
//! - `POST /api/chat/sessions`: open a session for the caller, returns the greeting
//! - `POST /api/chat/sessions/:id/messages`: one patient turn
//! - `POST /api/chat/sessions/:id/score`: direct 0-10 score
//! - `GET /api/chat/sessions/:id`: current transcript and state
//! - `DELETE /api/chat/sessions/:id`: restart an open conversation
//! - `GET /api/chat/quick-replies`
//!
//! The turn that completes a report closes its session; later requests for
//! that id get 404.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, PatientContext};
use crate::config::MAX_MESSAGE_CHARS;
use crate::triage::severity::MAX_SCORE;
use crate::triage::templates::{self, QuickReply, QUICK_REPLIES};
use crate::triage::{SessionRecord, TurnOutcome};

#[derive(Serialize)]
pub struct StartSessionResponse {
    pub session_id: Uuid,
    pub greeting: String,
    pub session: SessionRecord,
}

#[derive(Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

#[derive(Deserialize)]
pub struct ScoreRequest {
    pub score: u8,
}

#[derive(Serialize)]
pub struct TurnResponse {
    pub outcome: TurnOutcome,
    pub session: SessionRecord,
}

fn parse_session_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid session id: {raw}")))
}

/// The session, if it belongs to the caller. Someone else's session is
/// reported as missing.
fn owned_session(ctx: &ApiContext, patient: &PatientContext, id: Uuid) -> Result<SessionRecord, ApiError> {
    let session = ctx.core.session(id)?;
    if session.patient_id != patient.patient_id {
        return Err(ApiError::NotFound(format!("Chat session not found: {id}")));
    }
    Ok(session)
}

/// Run one turn off the async executor.
async fn run_turn(
    ctx: &ApiContext,
    patient: &PatientContext,
    id: Uuid,
    text: String,
) -> Result<TurnResponse, ApiError> {
    owned_session(ctx, patient, id)?;
    let (outcome, session) = ctx
        .blocking(move |core| core.send_message(id, &text))
        .await?;
    Ok(TurnResponse { outcome, session })
}

/// `POST /api/chat/sessions`
pub async fn start(
    State(ctx): State<ApiContext>,
    Extension(patient): Extension<PatientContext>,
) -> Result<(StatusCode, Json<StartSessionResponse>), ApiError> {
    let session = ctx.core.start_session(&patient.patient_id)?;
    let greeting = session
        .messages()
        .first()
        .map(|m| m.content.clone())
        .unwrap_or_default();
    Ok((
        StatusCode::CREATED,
        Json(StartSessionResponse {
            session_id: session.id,
            greeting,
            session,
        }),
    ))
}

/// `POST /api/chat/sessions/:id/messages`
pub async fn send(
    State(ctx): State<ApiContext>,
    Extension(patient): Extension<PatientContext>,
    Path(raw_id): Path<String>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<TurnResponse>, ApiError> {
    let id = parse_session_id(&raw_id)?;
    let text = req.text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".into()));
    }
    if text.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ApiError::BadRequest(format!(
            "Message too long (max {MAX_MESSAGE_CHARS} chars)"
        )));
    }
    Ok(Json(run_turn(&ctx, &patient, id, text.to_string()).await?))
}

/// `POST /api/chat/sessions/:id/score`: slider input, sent as a sentence.
pub async fn score(
    State(ctx): State<ApiContext>,
    Extension(patient): Extension<PatientContext>,
    Path(raw_id): Path<String>,
    Json(req): Json<ScoreRequest>,
) -> Result<Json<TurnResponse>, ApiError> {
    let id = parse_session_id(&raw_id)?;
    if req.score > MAX_SCORE {
        return Err(ApiError::BadRequest(format!("Score must be 0-{MAX_SCORE}")));
    }
    let text = templates::direct_score_text(req.score);
    Ok(Json(run_turn(&ctx, &patient, id, text).await?))
}

/// `GET /api/chat/sessions/:id`
pub async fn session(
    State(ctx): State<ApiContext>,
    Extension(patient): Extension<PatientContext>,
    Path(raw_id): Path<String>,
) -> Result<Json<SessionRecord>, ApiError> {
    let id = parse_session_id(&raw_id)?;
    Ok(Json(owned_session(&ctx, &patient, id)?))
}

/// `DELETE /api/chat/sessions/:id`: start the report over in the same session.
pub async fn reset(
    State(ctx): State<ApiContext>,
    Extension(patient): Extension<PatientContext>,
    Path(raw_id): Path<String>,
) -> Result<Json<SessionRecord>, ApiError> {
    let id = parse_session_id(&raw_id)?;
    owned_session(&ctx, &patient, id)?;
    Ok(Json(ctx.core.reset_session(id)?))
}

/// `GET /api/chat/quick-replies`
pub async fn quick_replies() -> Json<&'static [QuickReply]> {
    Json(QUICK_REPLIES)
}
