//! Router for the booking API

use axum::{Router, extract::State, response::Json};

use super::public;
use crate::api::SharedState;

/// Latest resolved booking for the room
async fn booking_handler(State(state): State<SharedState>) -> Json<public::BookingResponse> {
    let shared_state = state.read().expect("Unable to read shared state");
    Json(public::BookingResponse::from(&shared_state.snapshot))
}

/// Create the booking router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", axum::routing::get(booking_handler))
}
