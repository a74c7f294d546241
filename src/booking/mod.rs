//! Room bookings and the resolution of which one to show.
//!
//! Everything in here is pure. Callers pass the reference time in
//! explicitly so the result only depends on the arguments.

pub mod source;
pub use source::{CalendarSource, DayWindow};

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

/// A reserved interval for the room as supplied by a calendar source.
///
/// `start` and `end` are optional because upstream records can be
/// missing either one. Such records are kept around so they can be
/// counted but they are never selected.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub title: String,
    pub date: NaiveDate,
    pub start: Option<DateTime<Tz>>,
    pub end: Option<DateTime<Tz>>,
}

impl Booking {
    pub fn new(title: &str, start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self {
            title: title.to_string(),
            date: start.date_naive(),
            start: Some(start),
            end: Some(end),
        }
    }

    /// The booking interval, only when both bounds exist and
    /// `start < end`.
    pub fn interval(&self) -> Option<(DateTime<Tz>, DateTime<Tz>)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start < end => Some((start, end)),
            _ => None,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.interval().is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    InSession,
    Upcoming,
    Available,
}

/// The booking chosen for display, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub booking: Option<Booking>,
    pub is_current: bool,
}

impl Selection {
    pub fn current(booking: Booking) -> Self {
        Self {
            booking: Some(booking),
            is_current: true,
        }
    }

    pub fn next(booking: Booking) -> Self {
        Self {
            booking: Some(booking),
            is_current: false,
        }
    }

    pub fn available() -> Self {
        Self::default()
    }

    pub fn status(&self) -> RoomStatus {
        match (&self.booking, self.is_current) {
            (Some(_), true) => RoomStatus::InSession,
            (Some(_), false) => RoomStatus::Upcoming,
            (None, _) => RoomStatus::Available,
        }
    }
}

/// Latest resolution result kept by the service between refresh
/// cycles.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub selection: Selection,
    pub last_updated: Option<DateTime<Tz>>,
}

/// Pick the booking to display at `now`.
///
/// A booking in session (`start <= now < end`) always wins. Otherwise
/// the earliest booking starting after `now` is returned. Malformed
/// bookings are skipped. Bookings sharing a start time keep their
/// input order.
pub fn resolve(now: &DateTime<Tz>, bookings: &[Booking]) -> Selection {
    let mut candidates = bookings
        .iter()
        .filter_map(|booking| booking.interval().map(|(start, end)| (booking, start, end)))
        .collect::<Vec<_>>();

    // Stable so ties on start fall back to input order
    candidates.sort_by_key(|(_, start, _)| *start);

    if let Some((booking, _, _)) = candidates
        .iter()
        .find(|(_, start, end)| start <= now && now < end)
    {
        return Selection::current((*booking).clone());
    }

    candidates
        .iter()
        .find(|(_, start, _)| start > now)
        .map(|(booking, _, _)| Selection::next((*booking).clone()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::Phoenix;

    fn at(hour: u32, minute: u32) -> DateTime<Tz> {
        Phoenix.with_ymd_and_hms(2025, 3, 14, hour, minute, 0).unwrap()
    }

    fn booking(title: &str, start: (u32, u32), end: (u32, u32)) -> Booking {
        Booking::new(title, at(start.0, start.1), at(end.0, end.1))
    }

    fn title(selection: &Selection) -> Option<&str> {
        selection.booking.as_ref().map(|b| b.title.as_str())
    }

    #[test]
    fn it_selects_booking_in_session() {
        let bookings = vec![booking("Standup", (9, 30), (10, 15))];
        let selection = resolve(&at(10, 0), &bookings);

        assert_eq!(title(&selection), Some("Standup"));
        assert!(selection.is_current);
        assert_eq!(selection.status(), RoomStatus::InSession);
    }

    #[test]
    fn it_selects_next_booking() {
        let bookings = vec![booking("Planning", (11, 0), (12, 0))];
        let selection = resolve(&at(10, 0), &bookings);

        assert_eq!(title(&selection), Some("Planning"));
        assert!(!selection.is_current);
        assert_eq!(selection.status(), RoomStatus::Upcoming);
    }

    #[test]
    fn it_reports_available_without_bookings() {
        let selection = resolve(&at(10, 0), &[]);

        assert_eq!(selection, Selection::available());
        assert_eq!(selection.status(), RoomStatus::Available);
    }

    #[test]
    fn it_skips_past_bookings() {
        let bookings = vec![
            booking("Old", (8, 0), (9, 0)),
            booking("Planning", (11, 0), (12, 0)),
        ];
        let selection = resolve(&at(10, 0), &bookings);

        assert_eq!(title(&selection), Some("Planning"));
        assert!(!selection.is_current);
    }

    #[test]
    fn it_excludes_inverted_intervals() {
        let bookings = vec![
            booking("Bad", (10, 30), (10, 0)),
            booking("Planning", (11, 0), (12, 0)),
        ];
        let selection = resolve(&at(10, 0), &bookings);

        assert_eq!(title(&selection), Some("Planning"));
        assert!(!selection.is_current);
    }

    #[test]
    fn it_prefers_session_over_later_booking() {
        let bookings = vec![
            booking("Standup", (9, 30), (10, 15)),
            booking("Planning", (11, 0), (12, 0)),
        ];
        let selection = resolve(&at(10, 0), &bookings);

        assert_eq!(title(&selection), Some("Standup"));
        assert!(selection.is_current);
    }

    #[test]
    fn it_reports_available_when_everything_is_over() {
        let bookings = vec![
            booking("Early", (7, 0), (8, 0)),
            booking("Old", (8, 0), (9, 0)),
        ];
        assert_eq!(resolve(&at(10, 0), &bookings).status(), RoomStatus::Available);
    }

    #[test]
    fn it_treats_end_as_exclusive() {
        let bookings = vec![booking("Standup", (9, 30), (10, 0))];
        assert_eq!(resolve(&at(10, 0), &bookings).status(), RoomStatus::Available);

        let bookings = vec![booking("Planning", (10, 0), (11, 0))];
        let selection = resolve(&at(10, 0), &bookings);
        assert_eq!(title(&selection), Some("Planning"));
        assert!(selection.is_current);
    }

    #[test]
    fn it_excludes_bookings_missing_bounds() {
        let mut missing_end = booking("No end", (9, 0), (12, 0));
        missing_end.end = None;
        let mut missing_start = booking("No start", (9, 0), (12, 0));
        missing_start.start = None;
        let bookings = vec![missing_end, missing_start, booking("Review", (13, 0), (14, 0))];

        let selection = resolve(&at(10, 0), &bookings);
        assert_eq!(title(&selection), Some("Review"));
        assert!(!selection.is_current);
    }

    #[test]
    fn it_excludes_zero_length_bookings() {
        let bookings = vec![booking("Empty", (11, 0), (11, 0))];
        assert_eq!(resolve(&at(10, 0), &bookings).status(), RoomStatus::Available);
    }

    #[test]
    fn it_does_not_depend_on_input_order() {
        let sorted = vec![
            booking("Standup", (9, 30), (10, 15)),
            booking("Planning", (11, 0), (12, 0)),
            booking("Retro", (15, 0), (16, 0)),
        ];
        let mut reversed = sorted.clone();
        reversed.reverse();

        for now in [at(8, 0), at(10, 0), at(10, 30), at(12, 30), at(17, 0)] {
            assert_eq!(resolve(&now, &sorted), resolve(&now, &reversed));
        }
        assert_eq!(title(&resolve(&at(12, 30), &reversed)), Some("Retro"));
    }

    #[test]
    fn it_picks_earliest_future_booking() {
        let bookings = vec![
            booking("Retro", (15, 0), (16, 0)),
            booking("Lunch", (12, 0), (13, 0)),
            booking("Planning", (11, 0), (12, 0)),
        ];
        assert_eq!(title(&resolve(&at(10, 0), &bookings)), Some("Planning"));
    }

    #[test]
    fn it_keeps_input_order_for_equal_starts() {
        let bookings = vec![
            booking("First", (11, 0), (12, 0)),
            booking("Second", (11, 0), (11, 30)),
        ];
        assert_eq!(title(&resolve(&at(10, 0), &bookings)), Some("First"));
        assert_eq!(title(&resolve(&at(11, 15), &bookings)), Some("First"));
    }

    #[test]
    fn it_compares_instants_across_timezones() {
        // 10:00 in Phoenix is 17:00 UTC
        let now = Tz::UTC.with_ymd_and_hms(2025, 3, 14, 17, 0, 0).unwrap();
        let bookings = vec![booking("Standup", (9, 30), (10, 15))];
        assert!(resolve(&now, &bookings).is_current);
    }

    #[test]
    fn it_is_idempotent() {
        let bookings = vec![
            booking("Bad", (10, 30), (10, 0)),
            booking("Standup", (9, 30), (10, 15)),
        ];
        let now = at(10, 0);
        assert_eq!(resolve(&now, &bookings), resolve(&now, &bookings));
    }
}
