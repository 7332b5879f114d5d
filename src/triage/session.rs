//! The per-conversation session record.

use std::collections::BTreeSet;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use uuid::Uuid;

use super::templates;
use crate::models::{AlertLevel, ChatMessage, SymptomTag};

/// State of one patient conversation, owned by whoever drives it.
///
/// `symptoms` only grows and `max_severity` never decreases until
/// [`SessionRecord::reset`].
#[derive(Debug, Clone, Serialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub patient_id: String,
    pub patient_name: String,
    pub post_op_day: i64,
    pub started_at: NaiveDateTime,
    messages: Vec<ChatMessage>,
    symptoms: BTreeSet<SymptomTag>,
    max_severity: Option<u8>,
    completed: bool,
    /// Highest alert level already raised in this session.
    alerted_level: Option<AlertLevel>,
}

impl SessionRecord {
    /// Open a session and post the greeting.
    pub fn start(patient_id: impl Into<String>, patient_name: impl Into<String>, post_op_day: i64) -> Self {
        let mut session = Self {
            id: Uuid::new_v4(),
            patient_id: patient_id.into(),
            patient_name: patient_name.into(),
            post_op_day,
            started_at: Local::now().naive_local(),
            messages: Vec::new(),
            symptoms: BTreeSet::new(),
            max_severity: None,
            completed: false,
            alerted_level: None,
        };
        session.greet();
        session
    }

    fn greet(&mut self) {
        let greeting = templates::greeting(&self.patient_name, self.post_op_day);
        self.messages.push(ChatMessage::assistant(greeting));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The last `n` messages, oldest first.
    pub fn recent_history(&self, n: usize) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    pub fn symptoms(&self) -> &BTreeSet<SymptomTag> {
        &self.symptoms
    }

    pub fn max_severity(&self) -> Option<u8> {
        self.max_severity
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn alerted_level(&self) -> Option<AlertLevel> {
        self.alerted_level
    }

    /// Union `tags` into the session. Re-adding a tag is a no-op.
    pub fn add_symptoms<I>(&mut self, tags: I)
    where
        I: IntoIterator<Item = SymptomTag>,
    {
        self.symptoms.extend(tags);
    }

    /// Fold a score into the running maximum and return the new maximum.
    pub fn record_score(&mut self, score: u8) -> u8 {
        let max = self.max_severity.map_or(score, |prev| prev.max(score));
        self.max_severity = Some(max);
        max
    }

    /// Append one user/assistant exchange.
    pub fn push_exchange(&mut self, user_text: &str, reply: &str) {
        self.messages.push(ChatMessage::user(user_text));
        self.messages.push(ChatMessage::assistant(reply));
    }

    pub fn complete(&mut self) {
        self.completed = true;
    }

    /// Remember that an alert of `level` went out. Red is never downgraded.
    pub fn mark_alerted(&mut self, level: AlertLevel) {
        self.alerted_level = match (self.alerted_level, level) {
            (Some(AlertLevel::Red), _) => Some(AlertLevel::Red),
            (_, level) => Some(level),
        };
    }

    /// Start over: clear everything observed and greet again.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.symptoms.clear();
        self.max_severity = None;
        self.completed = false;
        self.alerted_level = None;
        self.started_at = Local::now().naive_local();
        self.greet();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageRole;

    fn session() -> SessionRecord {
        SessionRecord::start("P56781227", "王大明", 2)
    }

    #[test]
    fn starts_with_greeting_only() {
        let s = session();
        assert_eq!(s.messages().len(), 1);
        assert_eq!(s.messages()[0].role, MessageRole::Assistant);
        assert!(s.messages()[0].content.contains("術後第 2 天"));
        assert!(s.symptoms().is_empty());
        assert_eq!(s.max_severity(), None);
        assert!(!s.is_completed());
    }

    #[test]
    fn adding_symptoms_is_idempotent() {
        let mut s = session();
        s.add_symptoms([SymptomTag::Pain, SymptomTag::Cough]);
        let before = s.symptoms().clone();
        s.add_symptoms([SymptomTag::Pain]);
        s.add_symptoms([SymptomTag::Cough, SymptomTag::Pain]);
        assert_eq!(s.symptoms(), &before);
    }

    #[test]
    fn max_severity_is_monotonic() {
        let mut s = session();
        assert_eq!(s.record_score(3), 3);
        assert_eq!(s.record_score(7), 7);
        assert_eq!(s.record_score(2), 7);
        assert_eq!(s.max_severity(), Some(7));
    }

    #[test]
    fn recent_history_is_bounded() {
        let mut s = session();
        for i in 0..20 {
            s.push_exchange(&format!("訊息{i}"), "收到");
        }
        assert_eq!(s.messages().len(), 41);
        let window = s.recent_history(16);
        assert_eq!(window.len(), 16);
        assert_eq!(window.last().unwrap().content, "收到");
        assert_eq!(s.recent_history(100).len(), 41);
    }

    #[test]
    fn red_alert_is_not_downgraded() {
        let mut s = session();
        s.mark_alerted(AlertLevel::Yellow);
        assert_eq!(s.alerted_level(), Some(AlertLevel::Yellow));
        s.mark_alerted(AlertLevel::Red);
        s.mark_alerted(AlertLevel::Yellow);
        assert_eq!(s.alerted_level(), Some(AlertLevel::Red));
    }

    #[test]
    fn reset_clears_state_and_greets_again() {
        let mut s = session();
        s.add_symptoms([SymptomTag::Fatigue]);
        s.record_score(8);
        s.push_exchange("很累", "了解");
        s.complete();
        s.mark_alerted(AlertLevel::Red);
        let id = s.id;

        s.reset();
        assert_eq!(s.id, id);
        assert_eq!(s.messages().len(), 1);
        assert!(s.symptoms().is_empty());
        assert_eq!(s.max_severity(), None);
        assert!(!s.is_completed());
        assert_eq!(s.alerted_level(), None);
    }
}
