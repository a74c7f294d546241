//! Router for the room display page and its navigation links

use axum::{
    Router,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;

use crate::api::SharedState;
use crate::api::public::ApiError;
use crate::jobs::refresh_snapshot;
use crate::view::{DisplayPage, render_display, render_site_not_configured};

async fn display_handler(State(state): State<SharedState>) -> Result<Html<String>, ApiError> {
    let page = {
        let shared_state = state.read().expect("Unable to read shared state");
        let config = &shared_state.config;
        DisplayPage::new(
            &config.room_name,
            config.refresh_interval.as_millis() as u64,
            &shared_state.snapshot,
        )
    };
    Ok(Html(render_display(&page)?))
}

/// Run one refresh cycle right away and go back to the display. A
/// failed fetch still redirects so the last known state is shown.
async fn refresh_handler(State(state): State<SharedState>) -> Redirect {
    let tz = state.read().expect("Unable to read shared state").config.timezone;
    let now = Utc::now().with_timezone(&tz);

    if let Err(e) = refresh_snapshot(&state, now).await {
        tracing::error!("Manual refresh failed: {:#}", e);
    }
    Redirect::to("/")
}

async fn external_site_handler(State(state): State<SharedState>) -> Result<Response, ApiError> {
    let (site_url, room_name) = {
        let shared_state = state.read().expect("Unable to read shared state");
        (
            shared_state.config.external_site_url.clone(),
            shared_state.config.room_name.clone(),
        )
    };

    match site_url {
        Some(url) => Ok(Redirect::to(&url).into_response()),
        None => Ok(Html(render_site_not_configured(&room_name)?).into_response()),
    }
}

/// Create the display router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", axum::routing::get(display_handler))
        .route("/refresh", axum::routing::get(refresh_handler))
        .route("/google-sites", axum::routing::get(external_site_handler))
}
