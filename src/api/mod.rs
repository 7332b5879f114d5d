//! HTTP API.
//!
//! Patient routes (registration, chat, education, own records) under
//! `/api/`, staff routes under `/api/staff/` behind a credential check.
//! The router is composable: `api_router()` returns a `Router` that can be
//! mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{start_api_server, ApiServer, ServerError, ServerInfo};
pub use types::ApiContext;
