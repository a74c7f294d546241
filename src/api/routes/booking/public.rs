//! Public types for the booking API
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::booking::{Selection, Snapshot};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct BookingView {
    pub title: String,
    pub date: String,     // YYYY-MM-DD
    pub start: String,    // RFC 3339 in the display timezone
    pub end: String,      // RFC 3339 in the display timezone
    pub duration: String, // H:MM:SS
    pub is_current: bool,
}

fn format_duration(duration: TimeDelta) -> String {
    let secs = duration.num_seconds();
    format!("{}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60)
}

impl BookingView {
    pub fn from_selection(selection: &Selection) -> Option<Self> {
        let booking = selection.booking.as_ref()?;
        let (start, end) = booking.interval()?;
        Some(Self {
            title: booking.title.clone(),
            date: booking.date.format("%Y-%m-%d").to_string(),
            start: start.to_rfc3339(),
            end: end.to_rfc3339(),
            duration: format_duration(end - start),
            is_current: selection.is_current,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingResponse {
    pub booking: Option<BookingView>,
    pub last_updated: Option<String>,
}

impl From<&Snapshot> for BookingResponse {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            booking: BookingView::from_selection(&snapshot.selection),
            last_updated: snapshot.last_updated.map(|dt| dt.to_rfc3339()),
        }
    }
}
