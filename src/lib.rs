//! Employee records core for the payroll screen.
//!
//! The screen lists employees in a table and edits them in a form. This crate holds the
//! parts that are not rendering: the key-casing adapter between the API and the screen,
//! record normalization, the form selection, and the coordinator that turns a submit into
//! a create or an update against an injected repository. A mock REST API serving an
//! in-memory store is included for local development.

pub mod api;
pub mod casing;
pub mod config;
pub mod coordinator;
pub mod errors;
pub mod models;
pub mod repository;
pub mod screen;
pub mod selection;

use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use casing::{to_external, to_internal, RawRecord};
pub use config::Config;
pub use coordinator::{SubmissionCoordinator, SubmissionOutcome, SubmitAction};
pub use errors::{RepositoryError, SubmissionError};
pub use models::{normalize_for_submission, EmployeeId, EmployeeRecord, NormalizedEmployee};
pub use repository::{EmployeeRepository, HttpEmployeeRepository, InMemoryEmployeeRepository};
pub use screen::{EmployeeScreen, FormView, TableRow};
pub use selection::SelectionState;

/// Mock API state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<InMemoryEmployeeRepository>,
    pub config: Arc<Config>,
}

/// Create the mock API router.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/employees",
            get(api::list_employees).post(api::create_employee),
        )
        .route("/employees/{id}", put(api::update_employee));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
