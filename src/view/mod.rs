//! HTML for the room display, rendered with Handlebars. Rendering is a
//! pure function of the page model so it never touches the calendar
//! or the clock. Handlebars escapes every `{{value}}` which matters
//! here since booking titles come straight from the calendar.

use std::fmt;

use anyhow::{Error, Result};
use chrono::DateTime;
use chrono_tz::Tz;
use handlebars::Handlebars;
use serde::Serialize;

use crate::booking::Snapshot;

const TIME_FORMAT: &str = "%I:%M %p";
const DATE_FORMAT: &str = "%A, %B %-d, %Y";

#[derive(Debug)]
pub enum Template {
    Display,
    SiteNotConfigured,
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

const DISPLAY_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>{{room_name}}</title>
    <meta charset="utf-8">
    <style>
        body {
            font-family: 'Segoe UI', Arial, sans-serif;
            margin: 0;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            color: white;
            height: 100vh;
            display: flex;
            justify-content: center;
            align-items: center;
        }
        .container { text-align: center; max-width: 800px; padding: 40px; }
        h1 { font-size: 3em; margin-bottom: 20px; text-shadow: 2px 2px 4px rgba(0,0,0,0.3); }
        .status { font-size: 1.5em; opacity: 0.9; }
        .booking-info { padding: 30px; border-radius: 15px; margin-top: 30px; }
        .booking-title { font-size: 2em; margin-bottom: 15px; }
        .booking-time { font-size: 1.3em; opacity: 0.9; }
        .current-booking { background: rgba(255,107,107,0.2); border: 2px solid rgba(255,107,107,0.5); }
        .next-booking { background: rgba(107,255,107,0.2); border: 2px solid rgba(107,255,107,0.5); }
        .last-updated { position: fixed; bottom: 20px; right: 20px; font-size: 0.9em; opacity: 0.7; }
        .controls { position: fixed; top: 20px; right: 20px; background: rgba(0,0,0,0.3); padding: 10px; border-radius: 10px; }
        .controls a { color: white; text-decoration: none; margin: 0 10px; padding: 5px 10px; background: rgba(255,255,255,0.2); border-radius: 5px; }
    </style>
    <script>
        setTimeout(function () { location.reload(); }, {{refresh_ms}});
    </script>
</head>
<body>
    <div class="controls">
        <a href="/google-sites">Google Sites</a>
        <a href="/refresh">Refresh</a>
    </div>
    <div class="container">
        <h1>{{room_name}}</h1>
        {{#if booking}}
        <div class="booking-info {{#if booking.is_current}}current-booking{{else}}next-booking{{/if}}">
            <div class="booking-title">{{booking.title}}</div>
            <div class="booking-date">Date: {{booking.date}}</div>
            <div class="booking-time">
                {{#if booking.is_current}}
                <strong>Currently in session</strong><br>
                Started: {{booking.start}} | Ends: {{booking.end}}
                {{else}}
                <strong>Next booking</strong><br>
                Time: {{booking.start}} - {{booking.end}}
                {{/if}}
            </div>
        </div>
        {{else}}
        <div class="status">
            <p>Room Available</p>
            <p>No upcoming bookings</p>
        </div>
        {{/if}}
    </div>
    {{#if last_updated}}
    <div class="last-updated">Last updated: {{last_updated}}</div>
    {{/if}}
</body>
</html>
"#;

const SITE_NOT_CONFIGURED_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head><title>{{room_name}}</title></head>
<body>
    <h1>External site URL not configured</h1>
    <a href="/">Back to main display</a>
</body>
</html>
"#;

pub fn templates<'a>() -> Result<Handlebars<'a>, Error> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry.register_template_string(&Template::Display.to_string(), DISPLAY_TEMPLATE)?;
    registry.register_template_string(
        &Template::SiteNotConfigured.to_string(),
        SITE_NOT_CONFIGURED_TEMPLATE,
    )?;
    Ok(registry)
}

/// A booking formatted for display.
#[derive(Debug, Serialize, PartialEq)]
pub struct BookingCard {
    pub title: String,
    pub date: String,
    pub start: String,
    pub end: String,
    pub is_current: bool,
}

/// Everything the display page shows.
#[derive(Debug, Serialize)]
pub struct DisplayPage {
    pub room_name: String,
    pub refresh_ms: u64,
    pub booking: Option<BookingCard>,
    pub last_updated: Option<String>,
}

fn format_time(dt: &DateTime<Tz>) -> String {
    dt.format(TIME_FORMAT).to_string()
}

impl DisplayPage {
    pub fn new(room_name: &str, refresh_ms: u64, snapshot: &Snapshot) -> Self {
        let selection = &snapshot.selection;
        let booking = selection.booking.as_ref().and_then(|booking| {
            let (start, end) = booking.interval()?;
            Some(BookingCard {
                title: booking.title.clone(),
                date: booking.date.format(DATE_FORMAT).to_string(),
                start: format_time(&start),
                end: format_time(&end),
                is_current: selection.is_current,
            })
        });

        Self {
            room_name: room_name.to_string(),
            refresh_ms,
            booking,
            last_updated: snapshot.last_updated.as_ref().map(format_time),
        }
    }
}

pub fn render_display(page: &DisplayPage) -> Result<String, Error> {
    Ok(templates()?.render(&Template::Display.to_string(), page)?)
}

pub fn render_site_not_configured(room_name: &str) -> Result<String, Error> {
    let data = serde_json::json!({ "room_name": room_name });
    Ok(templates()?.render(&Template::SiteNotConfigured.to_string(), &data)?)
}
