//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. Access logger (all routes)
//! 2. Credential check: staff routes take staff logins, patient record and
//!    chat routes take the patient's phone and password

pub mod access;
pub mod patient;
pub mod staff;

use axum::http::Request;

/// Owned copy of a header value. Holding a borrow of the request across
/// `next.run(..).await` would make the middleware future `!Send`.
pub(crate) fn header_value(req: &Request<axum::body::Body>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
