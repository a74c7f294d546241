use anyhow::Result;
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::booking::{CalendarSource, DayWindow, RoomStatus, resolve};
use crate::core::AppConfig;
use crate::graph::GraphBookings;

/// Walk through token, business lookup and today's bookings, printing
/// what the display would show.
pub async fn run() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let source = GraphBookings::new(&config);

    println!("Booking businesses:");
    for business in source.list_businesses().await? {
        println!(
            "  - {} ({}) <{}>",
            business.id,
            business.display_name.as_deref().unwrap_or("N/A"),
            business.email.as_deref().unwrap_or("N/A")
        );
    }

    let now = Utc::now().with_timezone(&config.timezone);
    let window = DayWindow::containing(&now);
    let bookings = source.fetch_bookings(&window).await?;

    println!(
        "\nBookings for {} on {}:",
        config.booking_business_id, window.date
    );
    for booking in &bookings {
        match booking.interval() {
            Some((start, end)) => println!(
                "  - {}: {} - {}",
                booking.title,
                start.format("%I:%M %p"),
                end.format("%I:%M %p")
            ),
            None => println!("  - {}: (ignored, invalid times)", booking.title),
        }
    }

    let selection = resolve(&now, &bookings);
    match (selection.status(), &selection.booking) {
        (RoomStatus::InSession, Some(booking)) => println!("\nIn session: {}", booking.title),
        (RoomStatus::Upcoming, Some(booking)) => println!("\nNext booking: {}", booking.title),
        _ => println!("\nRoom available"),
    }

    Ok(())
}
