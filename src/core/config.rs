use std::env;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use chrono_tz::Tz;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub booking_business_id: String,
    pub room_name: String,
    pub external_site_url: Option<String>,
    pub refresh_interval: Duration,
    pub timezone: Tz,
    pub graph_api_url: String,
    pub login_api_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup. Empty values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required =
            |key: &str| get(key).with_context(|| format!("Missing env var {}", key));

        let refresh_interval = match get("ROOMBOARD_REFRESH_INTERVAL") {
            Some(secs) => secs
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid ROOMBOARD_REFRESH_INTERVAL: {}", secs))?,
            None => 300,
        };
        if refresh_interval == 0 {
            bail!("ROOMBOARD_REFRESH_INTERVAL must be greater than zero");
        }

        let timezone = match get("ROOMBOARD_TIMEZONE") {
            Some(name) => name
                .trim()
                .parse::<Tz>()
                .map_err(|_| anyhow!("Invalid ROOMBOARD_TIMEZONE: {}", name))?,
            None => Tz::UTC,
        };

        Ok(Self {
            client_id: required("ROOMBOARD_CLIENT_ID")?,
            client_secret: required("ROOMBOARD_CLIENT_SECRET")?,
            tenant_id: required("ROOMBOARD_TENANT_ID")?,
            booking_business_id: required("ROOMBOARD_BOOKING_BUSINESS_ID")?,
            room_name: get("ROOMBOARD_ROOM_NAME").unwrap_or_else(|| "Conference Room".to_string()),
            external_site_url: get("ROOMBOARD_EXTERNAL_SITE_URL"),
            refresh_interval: Duration::from_secs(refresh_interval),
            timezone,
            graph_api_url: get("ROOMBOARD_GRAPH_URL")
                .unwrap_or_else(|| "https://graph.microsoft.com".to_string()),
            login_api_url: get("ROOMBOARD_LOGIN_URL")
                .unwrap_or_else(|| "https://login.microsoftonline.com".to_string()),
        })
    }
}
