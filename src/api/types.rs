//! Shared types for the HTTP layer.

use std::sync::Arc;

use crate::api::ApiError;
use crate::core_state::CoreState;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }

    /// Run core work on the blocking pool. Store writes fsync and a chat
    /// turn may wait on the remote model.
    pub async fn blocking<T, E, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&CoreState) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<ApiError> + Send + 'static,
    {
        let core = self.core.clone();
        tokio::task::spawn_blocking(move || f(&core))
            .await?
            .map_err(Into::into)
    }
}

/// Authenticated staff member, injected into request extensions by the
/// staff middleware.
#[derive(Debug, Clone)]
pub struct StaffContext {
    pub username: String,
}

/// Authenticated patient, injected into request extensions by the
/// patient middleware.
#[derive(Debug, Clone)]
pub struct PatientContext {
    pub patient_id: String,
}

impl PatientContext {
    /// Reject access to another patient's records.
    pub fn ensure_self(&self, patient_id: &str) -> Result<(), ApiError> {
        if self.patient_id == patient_id {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "Records belong to another patient".into(),
            ))
        }
    }
}

/// Default page size for list endpoints.
pub const DEFAULT_LIST_LIMIT: usize = 50;
/// Largest page a client may ask for.
pub const MAX_LIST_LIMIT: usize = 500;

/// Clamp an optional `limit` query parameter.
pub fn list_limit(requested: Option<usize>) -> usize {
    requested.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_may_only_reach_own_records() {
        let ctx = PatientContext {
            patient_id: "P1".into(),
        };
        assert!(ctx.ensure_self("P1").is_ok());
        assert!(matches!(
            ctx.ensure_self("P2"),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn blocking_maps_errors() {
        let (_dir, state) = crate::core_state::test_support::test_state();
        let ctx = ApiContext::new(Arc::new(state));

        let name = ctx
            .blocking(|core| core.store().patient("P1").map(|p| p.map(|p| p.name)))
            .await
            .unwrap();
        assert_eq!(name.as_deref(), Some("王大明"));

        let err = ctx
            .blocking(|core| core.store().mark_as_read("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(list_limit(None), DEFAULT_LIST_LIMIT);
        assert_eq!(list_limit(Some(0)), 1);
        assert_eq!(list_limit(Some(10)), 10);
        assert_eq!(list_limit(Some(100_000)), MAX_LIST_LIMIT);
    }
}
