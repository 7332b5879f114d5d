//! Patient credential middleware.
//!
//! Reads `X-Patient-Phone` / `X-Patient-Password`, checks them against the
//! record store (plaintext equality, as at login) and injects
//! `PatientContext` for downstream handlers.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::header_value;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, PatientContext};
use crate::store::StoreError;

pub const PATIENT_PHONE_HEADER: &str = "X-Patient-Phone";
pub const PATIENT_PASSWORD_HEADER: &str = "X-Patient-Password";

/// Require the phone and password of a registered patient.
pub async fn require_patient(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_patient_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_patient_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let phone = header_value(&req, PATIENT_PHONE_HEADER).ok_or(ApiError::PatientUnauthorized)?;
    let password =
        header_value(&req, PATIENT_PASSWORD_HEADER).ok_or(ApiError::PatientUnauthorized)?;

    let login = match ctx.core.store().login(&phone, &password) {
        Ok(login) => login,
        Err(StoreError::UnknownAccount | StoreError::WrongPassword) => {
            tracing::warn!("Patient credentials rejected");
            return Err(ApiError::PatientUnauthorized);
        }
        Err(e) => return Err(e.into()),
    };

    req.extensions_mut().insert(PatientContext {
        patient_id: login.patient.id,
    });
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Extension, Router};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::core_state::test_support::{test_state, TEST_PASSWORD, TEST_PHONE};

    async fn whoami(Extension(patient): Extension<PatientContext>) -> String {
        patient.patient_id
    }

    fn app() -> (tempfile::TempDir, Router) {
        let (dir, state) = test_state();
        let ctx = ApiContext::new(Arc::new(state));
        let app = Router::new()
            .route("/whoami", get(whoami))
            .layer(axum::middleware::from_fn(require_patient))
            .layer(Extension(ctx));
        (dir, app)
    }

    fn request(phone: Option<&str>, password: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(phone) = phone {
            builder = builder.header(PATIENT_PHONE_HEADER, phone);
        }
        if let Some(password) = password {
            builder = builder.header(PATIENT_PASSWORD_HEADER, password);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn login_identifies_the_patient() {
        let (_dir, app) = app();
        let response = app
            .oneshot(request(Some(TEST_PHONE), Some(TEST_PASSWORD)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"P1");
    }

    #[tokio::test]
    async fn rejected_logins_look_alike() {
        let (_dir, app) = app();
        for req in [
            request(None, None),
            request(Some(TEST_PHONE), None),
            request(Some(TEST_PHONE), Some("guess")),
            request(Some("0900000000"), Some(TEST_PASSWORD)),
        ] {
            let response = app.clone().oneshot(req).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(json["error"]["code"], "PATIENT_AUTH_REQUIRED");
        }
    }
}
