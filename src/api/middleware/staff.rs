//! Staff credential middleware.
//!
//! Reads `X-Staff-User` / `X-Staff-Password`, checks them against the
//! configured staff logins and injects `StaffContext` into request
//! extensions for downstream handlers.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::header_value;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, StaffContext};

pub const STAFF_USER_HEADER: &str = "X-Staff-User";
pub const STAFF_PASSWORD_HEADER: &str = "X-Staff-Password";

/// Require configured staff credentials.
///
/// Accesses `ApiContext` from request extensions (injected by Extension layer).
pub async fn require_staff(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_staff_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_staff_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let (username, password) = (
        header_value(&req, STAFF_USER_HEADER).ok_or(ApiError::Unauthorized)?,
        header_value(&req, STAFF_PASSWORD_HEADER).ok_or(ApiError::Unauthorized)?,
    );

    if !ctx.core.check_staff(&username, &password) {
        tracing::warn!(username = %username, "Staff credentials rejected");
        return Err(ApiError::Unauthorized);
    }

    req.extensions_mut().insert(StaffContext { username });
    Ok(next.run(req).await)
}
