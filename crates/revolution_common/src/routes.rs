// --- File: crates/revolution_common/src/routes.rs ---

use crate::handlers::health_handler;
use axum::{routing::get, Router};

/// Creates a router with the routes shared by every Revolution service.
pub fn routes() -> Router {
    Router::new().route("/health", get(health_handler))
}
