//! Shared server state: configuration, record store, triage engine and the
//! live chat sessions.
//!
//! Each session sits behind its own mutex so one slow turn (a remote
//! completion can take up to the configured timeout) never blocks other
//! patients.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use uuid::Uuid;

use crate::config::AppConfig;
use crate::intake;
use crate::llm::OpenAiClient;
use crate::store::{JsonStore, StoreError};
use crate::triage::{SessionRecord, TriageEngine, TurnOutcome};

/// Errors from CoreState operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Chat session not found: {0}")]
    SessionNotFound(Uuid),
    #[error("Chat session already completed: {0}")]
    SessionCompleted(Uuid),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

type SharedSession = Arc<Mutex<SessionRecord>>;

pub struct CoreState {
    pub config: AppConfig,
    store: JsonStore,
    engine: TriageEngine,
    sessions: RwLock<HashMap<Uuid, SharedSession>>,
}

impl CoreState {
    pub fn new(config: AppConfig, store: JsonStore, engine: TriageEngine) -> Self {
        Self {
            config,
            store,
            engine,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Open the configured store and build the engine.
    ///
    /// A remote client that cannot be built leaves the engine on local rules.
    /// Must not be called from inside an async context: the blocking HTTP
    /// client owns its own runtime.
    pub fn from_config(config: AppConfig) -> Result<Self, CoreError> {
        let store = JsonStore::open(&config.data_file)?;
        let engine = match OpenAiClient::from_config(&config) {
            Some(Ok(client)) => {
                tracing::info!(model = %client.model(), "Remote completion enabled");
                TriageEngine::with_remote(Box::new(client))
            }
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Remote completion unavailable, using local rules");
                TriageEngine::local()
            }
            None => {
                tracing::info!("No API key configured, using local rules");
                TriageEngine::local()
            }
        };
        Ok(Self::new(config, store, engine))
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    pub fn engine(&self) -> &TriageEngine {
        &self.engine
    }

    pub fn check_staff(&self, username: &str, password: &str) -> bool {
        self.config.check_staff(username, password)
    }

    fn shared_session(&self, id: Uuid) -> Result<SharedSession, CoreError> {
        let sessions = self.sessions.read().map_err(|_| CoreError::LockPoisoned)?;
        sessions.get(&id).cloned().ok_or(CoreError::SessionNotFound(id))
    }

    /// Open a chat session for a registered patient.
    pub fn start_session(&self, patient_id: &str) -> Result<SessionRecord, CoreError> {
        let patient = self
            .store
            .patient(patient_id)?
            .ok_or_else(|| StoreError::PatientNotFound(patient_id.to_string()))?;
        let today = chrono::Local::now().date_naive();
        let session = SessionRecord::start(&patient.id, &patient.name, patient.post_op_day(today));
        let snapshot = session.clone();
        self.sessions
            .write()
            .map_err(|_| CoreError::LockPoisoned)?
            .insert(session.id, Arc::new(Mutex::new(session)));
        tracing::debug!(session_id = %snapshot.id, patient_id, "Chat session started");
        Ok(snapshot)
    }

    pub fn session(&self, id: Uuid) -> Result<SessionRecord, CoreError> {
        let shared = self.shared_session(id)?;
        let session = shared.lock().map_err(|_| CoreError::LockPoisoned)?;
        Ok(session.clone())
    }

    /// Run one patient turn. Blocks for the remote call when one is configured.
    ///
    /// The turn that completes the report also closes the session: its
    /// record is returned and then dropped from the live set.
    pub fn send_message(&self, id: Uuid, text: &str) -> Result<(TurnOutcome, SessionRecord), CoreError> {
        let shared = self.shared_session(id)?;
        let (outcome, snapshot) = {
            let mut session = shared.lock().map_err(|_| CoreError::LockPoisoned)?;
            // A concurrent turn may have completed it while we waited.
            if session.is_completed() {
                return Err(CoreError::SessionCompleted(id));
            }
            let outcome = intake::handle_turn(&self.engine, &self.store, &mut session, text);
            (outcome, session.clone())
        };
        if snapshot.is_completed() {
            self.close_session(id)?;
        }
        Ok((outcome, snapshot))
    }

    fn close_session(&self, id: Uuid) -> Result<(), CoreError> {
        self.sessions
            .write()
            .map_err(|_| CoreError::LockPoisoned)?
            .remove(&id);
        tracing::debug!(session_id = %id, "Chat session closed");
        Ok(())
    }

    /// Clear an open conversation and greet again.
    pub fn reset_session(&self, id: Uuid) -> Result<SessionRecord, CoreError> {
        let shared = self.shared_session(id)?;
        let mut session = shared.lock().map_err(|_| CoreError::LockPoisoned)?;
        session.reset();
        Ok(session.clone())
    }

    pub fn session_count(&self) -> Result<usize, CoreError> {
        Ok(self.sessions.read().map_err(|_| CoreError::LockPoisoned)?.len())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub const TEST_PHONE: &str = "0911222333";
    pub const TEST_PASSWORD: &str = "pw1234";

    /// State over a temp store with local rules and one registered patient
    /// (`P1`, surgery two days ago, logs in with `TEST_PHONE`/`TEST_PASSWORD`).
    pub fn test_state() -> (tempfile::TempDir, CoreState) {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            data_file: dir.path().join("records.json"),
            ..AppConfig::default()
        };
        let store = JsonStore::open(&config.data_file).unwrap();
        let surgery_date = chrono::Local::now().date_naive() - chrono::Duration::days(2);
        store
            .get_or_create_patient(
                "P1",
                Some(crate::models::NewPatient {
                    name: Some("王大明".into()),
                    phone: Some(TEST_PHONE.into()),
                    password: Some(TEST_PASSWORD.into()),
                    surgery_date: Some(surgery_date),
                    ..Default::default()
                }),
            )
            .unwrap();
        (dir, CoreState::new(config, store, TriageEngine::local()))
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::test_state;
    use super::*;

    #[test]
    fn session_greets_with_post_op_day() {
        let (_dir, state) = test_state();
        let session = state.start_session("P1").unwrap();
        assert_eq!(session.post_op_day, 2);
        assert!(session.messages()[0].content.contains("王大明"));
        assert_eq!(state.session_count().unwrap(), 1);
    }

    #[test]
    fn unknown_patient_cannot_start() {
        let (_dir, state) = test_state();
        assert!(matches!(
            state.start_session("NOPE"),
            Err(CoreError::Store(StoreError::PatientNotFound(_)))
        ));
    }

    #[test]
    fn turns_update_the_stored_session() {
        let (_dir, state) = test_state();
        let id = state.start_session("P1").unwrap().id;
        let (outcome, session) = state.send_message(id, "大概 6 分").unwrap();
        assert_eq!(outcome.score, Some(6));
        assert_eq!(session.max_severity(), Some(6));
        assert_eq!(state.session(id).unwrap().messages().len(), 3);
    }

    #[test]
    fn completed_session_is_closed() {
        let (_dir, state) = test_state();
        let id = state.start_session("P1").unwrap().id;
        let (outcome, session) = state.send_message(id, "沒有了，結束").unwrap();
        assert!(outcome.session_completed);
        assert!(session.is_completed());
        assert_eq!(state.store().patient_reports("P1", 5).unwrap().len(), 1);

        assert_eq!(state.session_count().unwrap(), 0);
        assert!(matches!(
            state.send_message(id, "還有"),
            Err(CoreError::SessionNotFound(_))
        ));
    }

    #[test]
    fn finished_sessions_do_not_accumulate() {
        let (_dir, state) = test_state();
        let open = state.start_session("P1").unwrap().id;
        for _ in 0..50 {
            let id = state.start_session("P1").unwrap().id;
            state.send_message(id, "沒有了，結束").unwrap();
        }
        assert_eq!(state.session_count().unwrap(), 1);
        assert!(state.session(open).is_ok());
        assert_eq!(state.store().patient_reports("P1", 100).unwrap().len(), 50);
    }

    #[test]
    fn reset_restarts_an_open_session() {
        let (_dir, state) = test_state();
        let id = state.start_session("P1").unwrap().id;
        state.send_message(id, "大概 6 分").unwrap();
        let reset = state.reset_session(id).unwrap();
        assert_eq!(reset.id, id);
        assert_eq!(reset.max_severity(), None);
        assert_eq!(reset.messages().len(), 1);
        assert!(state.send_message(id, "有點累").is_ok());
    }

    #[test]
    fn unknown_session_is_reported() {
        let (_dir, state) = test_state();
        let id = Uuid::new_v4();
        assert!(matches!(state.session(id), Err(CoreError::SessionNotFound(x)) if x == id));
    }
}
