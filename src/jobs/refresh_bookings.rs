use std::time::Duration;

use anyhow::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use super::PeriodicJob;
use crate::api::SharedState;
use crate::booking::{DayWindow, Selection, Snapshot, resolve};

#[derive(Debug)]
pub struct RefreshBookings {
    interval: Duration,
}

impl RefreshBookings {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

#[async_trait]
impl PeriodicJob for RefreshBookings {
    fn interval(&self) -> Duration {
        self.interval
    }

    async fn run_job(&self, state: &SharedState) {
        let tz = state.read().expect("Unable to read shared state").config.timezone;
        let now = Utc::now().with_timezone(&tz);

        // On failure the previous snapshot stays on screen until a
        // later cycle succeeds
        if let Err(e) = refresh_snapshot(state, now).await {
            tracing::error!("Failed to refresh bookings: {:#}", e);
        }
    }
}

/// Run one fetch and resolve cycle for `now` and store the result.
pub async fn refresh_snapshot(state: &SharedState, now: DateTime<Tz>) -> Result<Selection, Error> {
    let source = state.read().expect("Unable to read shared state").source.clone();

    let window = DayWindow::containing(&now);
    let bookings = source.fetch_bookings(&window).await?;

    let malformed = bookings.iter().filter(|b| !b.is_well_formed()).count();
    if malformed > 0 {
        tracing::warn!("Ignoring {} malformed bookings", malformed);
    }

    let selection = resolve(&now, &bookings);
    match &selection.booking {
        Some(booking) => tracing::info!(
            "{} booking: {}",
            if selection.is_current { "Current" } else { "Next" },
            booking.title
        ),
        None => tracing::info!("No upcoming bookings found"),
    }

    let mut shared_state = state.write().expect("Unable to write shared state");
    shared_state.snapshot = Snapshot {
        selection: selection.clone(),
        last_updated: Some(now),
    };

    Ok(selection)
}
