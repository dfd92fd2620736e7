// --- File: crates/revolution_scheduling/src/routes.rs ---

use crate::handlers::{
    board_handler, create_appointment_handler, create_blackout_day_handler,
    delete_blackout_day_handler, earliest_slot_handler, list_blackout_days_handler,
    move_card_handler, refresh_board_handler, update_appointment_handler, validate_handler,
    SchedulingState,
};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

/// Creates a router containing all scheduling, board and blackout-day routes.
/// Paths are relative; the backend nests them under `/api`.
pub fn routes(state: Arc<SchedulingState>) -> Router {
    Router::new()
        .route("/appointments", post(create_appointment_handler))
        .route("/appointments/earliest-slot", get(earliest_slot_handler))
        .route("/appointments/validate", post(validate_handler))
        .route("/appointments/{id}", put(update_appointment_handler))
        .route("/board", get(board_handler))
        .route("/board/refresh", post(refresh_board_handler))
        .route("/board/{id}/lane", put(move_card_handler))
        .route(
            "/blackout-days",
            get(list_blackout_days_handler).post(create_blackout_day_handler),
        )
        .route("/blackout-days/{id}", delete(delete_blackout_day_handler))
        .with_state(state)
}
