//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use axum::{Router, body::Body};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use roomboard::api::{AppState, SharedState, app};
use roomboard::booking::{Booking, CalendarSource, DayWindow};
use roomboard::core::AppConfig;

/// Calendar source returning a fixed set of bookings.
pub struct StubSource(pub Vec<Booking>);

#[async_trait]
impl CalendarSource for StubSource {
    async fn fetch_bookings(&self, _window: &DayWindow) -> Result<Vec<Booking>, Error> {
        Ok(self.0.clone())
    }
}

/// Calendar source that always fails like an unreachable upstream.
pub struct FailingSource;

#[async_trait]
impl CalendarSource for FailingSource {
    async fn fetch_bookings(&self, _window: &DayWindow) -> Result<Vec<Booking>, Error> {
        Err(anyhow!("calendar unavailable"))
    }
}

pub fn test_config(external_site_url: Option<&str>) -> AppConfig {
    AppConfig {
        client_id: String::from("test_client_id"),
        client_secret: String::from("test_client_secret"),
        tenant_id: String::from("test_tenant"),
        booking_business_id: String::from("room-1"),
        room_name: String::from("Upper Room"),
        external_site_url: external_site_url.map(String::from),
        refresh_interval: Duration::from_secs(300),
        timezone: Tz::UTC,
        graph_api_url: String::from("http://localhost:1"),
        login_api_url: String::from("http://localhost:1"),
    }
}

/// Shared state backed by `source` with an empty snapshot.
pub fn test_state(source: Arc<dyn CalendarSource>, config: AppConfig) -> SharedState {
    Arc::new(RwLock::new(AppState::new(source, config)))
}

/// Creates a test application router around `state`.
pub fn test_app(state: &SharedState) -> Router {
    app(Arc::clone(state))
}

/// Time relative to now, in the display timezone used by `test_config`.
pub fn minutes_from_now(minutes: i64) -> DateTime<Tz> {
    (Utc::now() + chrono::Duration::minutes(minutes)).with_timezone(&Tz::UTC)
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}
