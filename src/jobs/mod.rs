//! Background jobs that run on a fixed interval for the lifetime of
//! the server.

mod refresh_bookings;
pub use refresh_bookings::{RefreshBookings, refresh_snapshot};

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::api::SharedState;

#[async_trait]
pub trait PeriodicJob: Debug + Send + Sync {
    fn interval(&self) -> Duration;

    async fn run_job(&self, state: &SharedState);
}

/// Spawn `job` in its own task. It runs right away and then once every
/// `interval()` until the process exits.
pub fn spawn_periodic_job<J>(state: SharedState, job: J) -> JoinHandle<()>
where
    J: PeriodicJob + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(job.interval());
        // A slow run pushes the schedule back instead of bursting
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            tracing::debug!("Running periodic job {:?}", job);
            job.run_job(&state).await;
        }
    })
}
