//! DeepSight demo binary
//!
//! Seeds the engine with the fixed demo dataset, starts the live feed
//! simulator and logs engine activity until interrupted. Stands in for
//! the dashboard frontend during development.

use deepsight_core::detection_source::{sample_alerts, sample_results};
use deepsight_core::view_projection::compute_stats;
use deepsight_core::{AppConfig, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deepsight_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting DeepSight demo v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::default();
    tracing::info!(
        feed_interval_secs = config.feed.interval.as_secs_f64(),
        trigger_probability = config.feed.trigger_probability,
        results_cap = config.feed.results_cap,
        alert_capacity = config.alert_capacity,
        "Configuration loaded"
    );

    let state = AppState::new(config);

    // Seed the demo dataset; sample data is newest first, the stores
    // prepend, so feed them oldest first
    for result in sample_results().into_iter().rev() {
        state.results.append(result).await;
    }
    for alert in sample_alerts().into_iter().rev() {
        state.alerts.push(alert).await;
    }
    tracing::info!(
        results = state.results.count().await,
        alerts = state.alerts.count().await,
        "Demo dataset seeded"
    );

    state.feed.start().await;

    tokio::signal::ctrl_c().await?;

    state.feed.stop().await;

    let stats = compute_stats(&state.results.snapshot().await);
    tracing::info!(
        total = stats.total,
        violations = stats.violations,
        authorized = stats.authorized,
        unread_alerts = state.alerts.unread_count().await,
        "Shutting down"
    );

    Ok(())
}
