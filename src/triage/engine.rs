//! One patient turn: remote completion first, local rules as the fallback.
//!
//! The local policy runs on every turn because the session signals
//! (symptoms, severity, escalation, completion) always come from it. The
//! remote collaborator, when configured and healthy, only supplies the
//! reply text.

use std::collections::BTreeSet;

use serde::Serialize;

use super::policy::{self, RuleKind, TurnInput};
use super::session::SessionRecord;
use super::severity::SeverityTier;
use crate::config::HISTORY_WINDOW;
use crate::llm::{ChatCompletion, LlmError, CARE_PERSONA};
use crate::models::SymptomTag;

/// Result of asking the remote collaborator for a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    Completed(String),
    NotConfigured,
    Failed(LlmError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Remote,
    Local,
}

/// Everything the caller needs to know about a processed turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub reply: String,
    pub escalate: bool,
    pub session_completed: bool,
    /// Score parsed from this turn, if any.
    pub score: Option<u8>,
    pub tier: Option<SeverityTier>,
    /// Symptoms mentioned in this turn.
    pub tags: BTreeSet<SymptomTag>,
    pub rule: RuleKind,
    pub source: ReplySource,
}

pub struct TriageEngine {
    remote: Option<Box<dyn ChatCompletion>>,
}

impl TriageEngine {
    /// Rules only.
    pub fn local() -> Self {
        Self { remote: None }
    }

    pub fn with_remote(remote: Box<dyn ChatCompletion>) -> Self {
        Self { remote: Some(remote) }
    }

    pub fn uses_external_model(&self) -> bool {
        self.remote.is_some()
    }

    fn ask_remote(&self, text: &str, session: &SessionRecord) -> RemoteOutcome {
        let Some(remote) = &self.remote else {
            return RemoteOutcome::NotConfigured;
        };
        match remote.complete(CARE_PERSONA, session.recent_history(HISTORY_WINDOW), text) {
            Ok(reply) => RemoteOutcome::Completed(reply),
            Err(e) => RemoteOutcome::Failed(e),
        }
    }

    /// Process one patient message against `session`.
    ///
    /// Never fails: remote errors are logged and replaced by the local reply.
    pub fn classify_and_respond(&self, text: &str, session: &mut SessionRecord) -> TurnOutcome {
        let input = TurnInput::new(text);
        let decision = policy::evaluate(&input);

        let (reply, source) = match self.ask_remote(text, session) {
            RemoteOutcome::Completed(reply) => (reply, ReplySource::Remote),
            RemoteOutcome::NotConfigured => (decision.reply, ReplySource::Local),
            RemoteOutcome::Failed(e) => {
                tracing::warn!(
                    kind = e.kind(),
                    error = %e,
                    "Remote completion failed, using rule-based reply"
                );
                (decision.reply, ReplySource::Local)
            }
        };

        session.add_symptoms(input.tags.iter().copied());
        if let Some(score) = decision.score {
            session.record_score(score);
        }
        session.push_exchange(text, &reply);
        if decision.completed {
            session.complete();
        }

        if decision.escalate {
            tracing::warn!(
                patient_id = %session.patient_id,
                score = decision.score.unwrap_or_default(),
                "Severe symptom score reported, escalating"
            );
        }

        TurnOutcome {
            reply,
            escalate: decision.escalate,
            session_completed: decision.completed,
            score: decision.score,
            tier: decision.tier,
            tags: input.tags,
            rule: decision.rule,
            source,
        }
    }
}
