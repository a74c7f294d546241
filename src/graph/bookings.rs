//! Microsoft Bookings calendar client.
//!
//! Appointments are read from the `calendarView` of the booking
//! business. Tenants where that endpoint is missing answer with a 404,
//! in which case all appointments are listed and filtered down to the
//! requested day locally.

use std::time::{Duration, Instant};

use anyhow::{Context, Error, Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use tokio::sync::Mutex;

use super::oauth::acquire_token_for_client;
use crate::booking::{Booking, CalendarSource, DayWindow};
use crate::core::AppConfig;

const ORDER_BY: (&str, &str) = ("$orderby", "startDateTime/dateTime");

// Tokens are renewed a little before they actually expire
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
}

/// Timestamps come back either as a `dateTimeTimeZone` object or as a
/// bare string depending on the endpoint. Anything else lands in
/// `Other` so one odd record never fails the whole page of results.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GraphDateTime {
    Zoned {
        #[serde(rename = "dateTime", default)]
        date_time: Option<String>,
        #[serde(rename = "timeZone", default)]
        time_zone: Option<String>,
    },
    Plain(String),
    Other(IgnoredAny),
}

impl GraphDateTime {
    pub fn parse(&self) -> Option<DateTime<Utc>> {
        match self {
            GraphDateTime::Zoned {
                date_time,
                time_zone,
            } => parse_graph_datetime(date_time.as_deref()?, time_zone.as_deref()),
            GraphDateTime::Plain(date_time) => parse_graph_datetime(date_time, None),
            GraphDateTime::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Option<String>,
    pub customer_name: Option<String>,
    pub service_name: Option<String>,
    pub start_date_time: Option<GraphDateTime>,
    pub end_date_time: Option<GraphDateTime>,
}

impl Appointment {
    pub fn title(&self) -> String {
        let customer = self
            .customer_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("Unknown Customer");
        let service = self
            .service_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("Booking");
        format!("{} - {}", customer, service)
    }

    /// Convert to a booking in the display timezone. Bounds that are
    /// missing or unparseable are left empty.
    pub fn to_booking(&self, tz: &Tz, day: NaiveDate) -> Booking {
        let local = |dt: &Option<GraphDateTime>| {
            dt.as_ref()
                .and_then(GraphDateTime::parse)
                .map(|parsed| parsed.with_timezone(tz))
        };
        let start = local(&self.start_date_time);
        let end = local(&self.end_date_time);
        if start.is_none() || end.is_none() {
            tracing::warn!(
                "Appointment {} has unusable times: start={:?} end={:?}",
                self.id.as_deref().unwrap_or("<no id>"),
                self.start_date_time,
                self.end_date_time
            );
        }

        Booking {
            title: self.title(),
            date: start.or(end).map(|dt| dt.date_naive()).unwrap_or(day),
            start,
            end,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingBusiness {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// Parse a Graph timestamp.
///
/// Values carrying an offset (or `Z`) are read as RFC 3339. Naive
/// values are read in `time_zone` when it names an IANA zone and in UTC
/// otherwise. Any number of fractional second digits is accepted.
pub fn parse_graph_datetime(raw: &str, time_zone: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()?;
    let tz = time_zone
        .and_then(|name| name.trim().parse::<Tz>().ok())
        .unwrap_or(Tz::UTC);
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn format_graph_datetime(dt: &DateTime<Tz>) -> String {
    dt.with_timezone(&Utc)
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Calendar source backed by a Microsoft Bookings business.
pub struct GraphBookings {
    client: Client,
    graph_url: String,
    login_url: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
    business_id: String,
    timezone: Tz,
    token: Mutex<Option<CachedToken>>,
}

impl GraphBookings {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            graph_url: config.graph_api_url.trim_end_matches('/').to_string(),
            login_url: config.login_api_url.clone(),
            tenant_id: config.tenant_id.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            business_id: config.booking_business_id.clone(),
            timezone: config.timezone,
            token: Mutex::new(None),
        }
    }

    async fn access_token(&self) -> Result<String, Error> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref()
            && Instant::now() < token.expires_at
        {
            return Ok(token.access_token.clone());
        }

        let resp = acquire_token_for_client(
            &self.client,
            &self.login_url,
            &self.tenant_id,
            &self.client_id,
            &self.client_secret,
        )
        .await
        .context("Failed to obtain access token")?;
        tracing::debug!("Obtained Graph access token");

        let lifetime = Duration::from_secs(resp.expires_in.unwrap_or(3600));
        let access_token = resp.access_token;
        *cached = Some(CachedToken {
            access_token: access_token.clone(),
            expires_at: Instant::now() + lifetime.saturating_sub(TOKEN_EXPIRY_MARGIN),
        });
        Ok(access_token)
    }

    async fn forget_token(&self) {
        *self.token.lock().await = None;
    }

    fn business_url(&self, path: &str) -> String {
        format!(
            "{}/v1.0/solutions/bookingBusinesses/{}{}",
            self.graph_url,
            urlencoding::encode(&self.business_id),
            path
        )
    }

    /// GET a Graph collection. `Ok(None)` means the endpoint answered
    /// with a 404.
    async fn get_collection<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<Vec<T>>, Error> {
        let token = self.access_token().await?;
        let res = self
            .client
            .get(url)
            .bearer_auth(token)
            .header("Content-Type", "application/json")
            .query(query)
            .send()
            .await?;
        let status = res.status();
        let text = res.text().await.unwrap_or_default();

        match status {
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::UNAUTHORIZED => {
                // Force a fresh token on the next call
                self.forget_token().await;
                bail!("Graph request unauthorized: {} ({})", status, text)
            }
            s if !s.is_success() => bail!("Graph request failed: {} ({})", status, text),
            _ => {
                let resp: ListResponse<T> = serde_json::from_str(&text)
                    .with_context(|| format!("Unexpected Graph response from {}", url))?;
                Ok(Some(resp.value))
            }
        }
    }

    /// List the booking businesses visible to the app.
    pub async fn list_businesses(&self) -> Result<Vec<BookingBusiness>, Error> {
        let url = format!("{}/v1.0/solutions/bookingBusinesses", self.graph_url);
        self.get_collection(&url, &[])
            .await?
            .context("Booking businesses endpoint not found")
    }

    /// Appointments within the window using `calendarView`, or `None`
    /// when the endpoint is not available.
    pub async fn calendar_view(&self, window: &DayWindow) -> Result<Option<Vec<Appointment>>, Error> {
        let start = format_graph_datetime(&window.start);
        let end = format_graph_datetime(&window.end);
        tracing::info!("Fetching bookings from {} to {}", start, end);

        self.get_collection(
            &self.business_url("/calendarView"),
            &[
                ("startDateTime", start.as_str()),
                ("endDateTime", end.as_str()),
                ORDER_BY,
            ],
        )
        .await
    }

    /// All appointments of the business, filtered to those starting
    /// within the window.
    pub async fn appointments_in(&self, window: &DayWindow) -> Result<Vec<Appointment>, Error> {
        let all: Vec<Appointment> = self
            .get_collection(&self.business_url("/appointments"), &[ORDER_BY])
            .await?
            .context("Booking business not found")?;
        let total = all.len();

        let appointments = all
            .into_iter()
            .filter(|appt| {
                appt.start_date_time
                    .as_ref()
                    .and_then(GraphDateTime::parse)
                    .map(|start| window.contains(&start.with_timezone(&self.timezone)))
                    .unwrap_or(false)
            })
            .collect::<Vec<_>>();
        tracing::info!(
            "Fetched {} total appointments, {} for {}",
            total,
            appointments.len(),
            window.date
        );
        Ok(appointments)
    }
}

#[async_trait]
impl CalendarSource for GraphBookings {
    async fn fetch_bookings(&self, window: &DayWindow) -> Result<Vec<Booking>, Error> {
        let appointments = match self.calendar_view(window).await? {
            Some(appointments) => appointments,
            None => {
                tracing::warn!(
                    "calendarView not available for {}, falling back to appointments",
                    self.business_id
                );
                self.appointments_in(window).await?
            }
        };
        tracing::info!("Found {} appointments", appointments.len());

        Ok(appointments
            .iter()
            .map(|appt| appt.to_booking(&self.timezone, window.date))
            .collect())
    }
}
