use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::routes;
use super::SharedState;
use crate::api::state::AppState;
use crate::core::AppConfig;
use crate::graph::GraphBookings;
use crate::jobs::{RefreshBookings, spawn_periodic_job};

pub fn app(shared_state: SharedState) -> Router {
    Router::new()
        // Display page, manual refresh and external site link
        .merge(routes::display::router())
        // API routes
        .nest("/api", routes::router())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::clone(&shared_state))
}

// Run the server
pub async fn serve(host: String, port: String, config: AppConfig) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format! {
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                }
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let source = Arc::new(GraphBookings::new(&config));
    let refresh_interval = config.refresh_interval;
    let app_state = AppState::new(source, config);
    let shared_state = Arc::new(RwLock::new(app_state));
    let app = app(Arc::clone(&shared_state));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server started. Listening on {}", listener.local_addr()?);

    // The first refresh runs immediately, then once per interval
    spawn_periodic_job(shared_state, RefreshBookings::new(refresh_interval));

    axum::serve(listener, app).await?;
    Ok(())
}
