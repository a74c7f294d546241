//! Microsoft Graph integration for room bookings.

pub mod bookings;
pub mod oauth;

pub use bookings::{Appointment, BookingBusiness, GraphBookings, parse_graph_datetime};
