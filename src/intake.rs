//! Runs a patient turn and hands its signals to the record sink.
//!
//! Sink failures are logged and dropped: the patient still gets the reply
//! and the conversation carries on as if the write had succeeded.

use crate::education::PushContext;
use crate::models::{AlertLevel, ReportDraft, SymptomTag};
use crate::store::{JsonStore, StoreError};
use crate::triage::{SessionRecord, TriageEngine, TurnOutcome};

/// Where escalations and finished reports go.
pub trait CareRecordSink: Send + Sync {
    fn append_report(&self, patient_id: &str, draft: ReportDraft) -> Result<(), StoreError>;

    fn create_alert(
        &self,
        patient_id: &str,
        level: AlertLevel,
        score: u8,
        symptoms: &[SymptomTag],
    ) -> Result<(), StoreError>;

    /// Send whatever handouts the auto-push rules call for.
    fn push_education(&self, patient_id: &str, ctx: &PushContext) -> Result<(), StoreError>;
}

impl CareRecordSink for JsonStore {
    fn append_report(&self, patient_id: &str, draft: ReportDraft) -> Result<(), StoreError> {
        self.save_report(patient_id, draft).map(|_| ())
    }

    fn create_alert(
        &self,
        patient_id: &str,
        level: AlertLevel,
        score: u8,
        symptoms: &[SymptomTag],
    ) -> Result<(), StoreError> {
        JsonStore::create_alert(self, patient_id, level, score, symptoms).map(|_| ())
    }

    fn push_education(&self, patient_id: &str, ctx: &PushContext) -> Result<(), StoreError> {
        self.check_auto_push(patient_id, ctx).map(|_| ())
    }
}

/// Whether an alert of `level` still has to go out, given what this
/// session already raised.
fn alert_needed(already: Option<AlertLevel>, level: AlertLevel) -> bool {
    match already {
        None => true,
        Some(AlertLevel::Yellow) => level == AlertLevel::Red,
        Some(AlertLevel::Red) => false,
    }
}

fn raise_alert<S: CareRecordSink + ?Sized>(sink: &S, session: &mut SessionRecord, score: u8) {
    let Some(level) = AlertLevel::for_score(score) else {
        return;
    };
    if !alert_needed(session.alerted_level(), level) {
        return;
    }
    let symptoms: Vec<SymptomTag> = session.symptoms().iter().copied().collect();
    match sink.create_alert(&session.patient_id, level, score, &symptoms) {
        Ok(()) => {
            tracing::info!(patient_id = %session.patient_id, level = %level, score, "Alert created");
            session.mark_alerted(level);
        }
        Err(e) => {
            tracing::warn!(patient_id = %session.patient_id, error = %e, "Alert not persisted");
        }
    }
}

fn file_report<S: CareRecordSink + ?Sized>(sink: &S, session: &mut SessionRecord) {
    let score = session.max_severity().unwrap_or(0);
    let symptoms: Vec<SymptomTag> = session.symptoms().iter().copied().collect();
    let draft = ReportDraft {
        symptoms: symptoms.clone(),
        overall_score: score,
        conversation: session.messages().to_vec(),
    };
    if let Err(e) = sink.append_report(&session.patient_id, draft) {
        tracing::warn!(patient_id = %session.patient_id, error = %e, "Report not persisted");
    }

    raise_alert(sink, session, score);

    let ctx = PushContext {
        post_op_day: session.post_op_day,
        symptoms: symptoms.iter().map(|s| s.label().to_string()).collect(),
        treatment: None,
    };
    if let Err(e) = sink.push_education(&session.patient_id, &ctx) {
        tracing::warn!(patient_id = %session.patient_id, error = %e, "Auto-push not persisted");
    }
}

/// One patient turn, end to end.
///
/// A severe score raises a red alert right away. Completing the session
/// files the report, raises a yellow alert for a moderate session maximum
/// if nothing was raised yet, and runs the auto-push rules.
pub fn handle_turn<S: CareRecordSink + ?Sized>(
    engine: &TriageEngine,
    sink: &S,
    session: &mut SessionRecord,
    text: &str,
) -> TurnOutcome {
    let outcome = engine.classify_and_respond(text, session);

    if outcome.escalate {
        if let Some(score) = outcome.score {
            raise_alert(sink, session, score);
        }
    }
    if outcome.session_completed {
        file_report(sink, session);
    }
    outcome
}
