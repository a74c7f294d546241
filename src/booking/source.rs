use anyhow::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

use super::Booking;

/// Anything that can list the bookings of the room for a day.
#[async_trait]
pub trait CalendarSource: Send + Sync {
    async fn fetch_bookings(&self, window: &DayWindow) -> Result<Vec<Booking>, Error>;
}

/// Local calendar day in the display timezone, as a half-open
/// `[start, end)` interval.
#[derive(Debug, Clone, PartialEq)]
pub struct DayWindow {
    pub date: NaiveDate,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl DayWindow {
    pub fn containing(now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let date = now.date_naive();
        let next = date.checked_add_days(Days::new(1)).unwrap_or(date);
        Self {
            date,
            start: local_midnight(&tz, date),
            end: local_midnight(&tz, next),
        }
    }

    pub fn contains(&self, instant: &DateTime<Tz>) -> bool {
        &self.start <= instant && instant < &self.end
    }
}

// Midnight can fall into a DST gap in a handful of zones, in which
// case the UTC reading of the wall clock is close enough.
fn local_midnight(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let naive = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}
