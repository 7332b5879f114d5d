//! HTTP API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Open routes (health, registration, login, education) and patient routes
//! live under `/api/`, staff routes under `/api/staff/`.
//!
//! Middleware stack (outermost → innermost):
//! Extension → CORS → Access log → Patient or staff check → Handler

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router over shared core state.
///
/// Middleware uses `Extension<ApiContext>` (injected as the outermost layer).
/// Endpoint handlers use `State<ApiContext>` (provided via `with_state`).
pub fn api_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn build_router(ctx: ApiContext) -> Router {
    use endpoints::{chat, education, health, patients, staff};

    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let staff_routes = Router::new()
        .route("/patients", get(staff::patients))
        .route("/patients/:id/surgery", put(staff::setup_surgery))
        .route("/alerts", get(staff::alerts))
        .route("/alerts/:id", axum::routing::patch(staff::update_alert))
        .route(
            "/interventions",
            get(staff::interventions).post(staff::create_intervention),
        )
        .route("/statistics", get(staff::statistics))
        .route("/pushes", get(staff::pushes).post(staff::push_material))
        .route("/pushes/auto", post(staff::auto_push))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::staff::require_staff));

    let patient_routes = Router::new()
        .route("/patients/:id/reports", get(patients::reports))
        .route("/patients/:id/pushes", get(patients::pushes))
        .route(
            "/patients/:id/pushes/:push_id/read",
            post(patients::mark_read),
        )
        .route("/chat/sessions", post(chat::start))
        .route("/chat/sessions/:id", get(chat::session).delete(chat::reset))
        .route("/chat/sessions/:id/messages", post(chat::send))
        .route("/chat/sessions/:id/score", post(chat::score))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::patient::require_patient));

    let open_routes = Router::new()
        .route("/health", get(health::check))
        .route("/patients/register", post(patients::register))
        .route("/patients/login", post(patients::login))
        .route("/chat/quick-replies", get(chat::quick_replies))
        .route("/education", get(education::list))
        .route("/education/recommended", get(education::recommended))
        .route("/education/:key", get(education::detail))
        .with_state(ctx.clone());

    Router::new()
        .nest(
            "/api",
            open_routes
                .merge(patient_routes)
                .nest("/staff", staff_routes),
        )
        .layer(axum::middleware::from_fn(middleware::access::log_access))
        .layer(CorsLayer::permissive())
        // Extension must be outermost so middleware can extract ApiContext
        .layer(axum::Extension(ctx))
}
