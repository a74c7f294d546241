//! API routes module

pub mod booking;
pub mod display;

use axum::Router;

use crate::api::SharedState;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Booking routes
        .nest("/booking", booking::router())
}
