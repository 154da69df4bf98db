//! LiveFeedSimulator - Timer-Driven Mock Detection Feed
//!
//! ## Responsibilities
//!
//! - Periodic Bernoulli-trial synthesis of new detections (each tick is an
//!   independent trial, not a rate-limited queue)
//! - Routing synthesized detections through the builder, the result store
//!   (capped) and the alert service
//!
//! Exists purely to animate the dashboard in the absence of a real
//! detection backend; production deployments replace the source and leave
//! this stopped.

use crate::alert_service::AlertService;
use crate::detection_builder;
use crate::detection_source::SharedSource;
use crate::models::{DetectionResult, OverallStatus};
use crate::result_store::ResultStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::interval;

/// Live feed configuration
#[derive(Debug, Clone)]
pub struct LiveFeedConfig {
    /// Tick interval
    pub interval: Duration,
    /// Per-tick probability of synthesizing a detection, in [0,1]
    pub trigger_probability: f64,
    /// Retention cap the feed applies to the result store
    pub results_cap: usize,
}

impl Default for LiveFeedConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            trigger_probability: 0.1,
            results_cap: 10,
        }
    }
}

/// LiveFeedSimulator instance
pub struct LiveFeedSimulator {
    config: LiveFeedConfig,
    source: SharedSource,
    results: Arc<ResultStore>,
    alerts: Arc<AlertService>,
    running: Arc<RwLock<bool>>,
}

impl LiveFeedSimulator {
    /// Create new LiveFeedSimulator
    pub fn new(
        config: LiveFeedConfig,
        source: SharedSource,
        results: Arc<ResultStore>,
        alerts: Arc<AlertService>,
    ) -> Self {
        Self {
            config,
            source,
            results,
            alerts,
            running: Arc::new(RwLock::new(false)),
        }
    }

    /// Start the feed loop
    pub async fn start(&self) {
        {
            let mut running = self.running.write().await;
            if *running {
                tracing::warn!("Live feed already running");
                return;
            }
            *running = true;
        }

        tracing::info!(
            interval_secs = self.config.interval.as_secs_f64(),
            trigger_probability = self.config.trigger_probability,
            results_cap = self.config.results_cap,
            "Starting live feed simulator"
        );

        let config = self.config.clone();
        let source = self.source.clone();
        let results = self.results.clone();
        let alerts = self.alerts.clone();
        let running = self.running.clone();

        tokio::spawn(async move {
            let mut ticker = interval(config.interval);

            loop {
                ticker.tick().await;

                {
                    let is_running = running.read().await;
                    if !*is_running {
                        break;
                    }
                }

                // Independent Bernoulli trial per tick
                let roll: f64 = rand::random();
                if roll >= config.trigger_probability {
                    continue;
                }

                match Self::produce_one(&source, &results, &alerts, config.results_cap).await {
                    Ok(result) => {
                        tracing::info!(
                            id = %result.id,
                            status = %result.overall_status,
                            "Live feed produced detection"
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Synthesized detection rejected");
                    }
                }
            }

            tracing::info!("Live feed simulator stopped");
        });
    }

    /// Stop the feed loop
    pub async fn stop(&self) {
        let mut running = self.running.write().await;
        *running = false;
        tracing::info!("Stopping live feed simulator");
    }

    /// Whether the feed loop is active
    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    /// Synthesize one detection and route it through the engine
    async fn produce_one(
        source: &SharedSource,
        results: &ResultStore,
        alerts: &AlertService,
        cap: usize,
    ) -> crate::error::Result<DetectionResult> {
        let raw = {
            let mut source = source.lock().await;
            source.next_detection()
        };

        let result = detection_builder::build_raw(raw)?;
        results.append_capped(result.clone(), cap).await;

        if result.overall_status == OverallStatus::Unauthorized {
            alerts.on_new_result(&result).await;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection_source::{DetectionSource, MockDetectionSource};
    use tokio::sync::Mutex;

    fn shared_source(seed: u64) -> SharedSource {
        let source: Box<dyn DetectionSource> = Box::new(MockDetectionSource::with_seed(seed));
        Arc::new(Mutex::new(source))
    }

    #[tokio::test]
    async fn test_produce_one_routes_through_stores() {
        let source = shared_source(42);
        let results = Arc::new(ResultStore::new());
        let alerts = Arc::new(AlertService::new(20));

        let mut violations: usize = 0;
        for _ in 0..20 {
            let result = LiveFeedSimulator::produce_one(&source, &results, &alerts, 10)
                .await
                .unwrap();
            if result.overall_status == OverallStatus::Unauthorized {
                violations += 1;
            }
        }

        // Store capped at 10 regardless of how many were produced
        assert_eq!(results.count().await, 10);
        // Every unauthorized detection raised exactly one alert
        assert_eq!(alerts.count().await, violations);
    }

    #[tokio::test]
    async fn test_produce_one_skips_alert_for_authorized() {
        let source = shared_source(1);
        let results = Arc::new(ResultStore::new());
        let alerts = Arc::new(AlertService::new(20));

        // Find an authorized detection in the stream
        for _ in 0..20 {
            let result = LiveFeedSimulator::produce_one(&source, &results, &alerts, 10)
                .await
                .unwrap();
            if result.overall_status == OverallStatus::Authorized {
                break;
            }
        }

        let alert_count = alerts.count().await;
        let violation_total: usize = results
            .snapshot()
            .await
            .iter()
            .filter(|r| r.overall_status == OverallStatus::Unauthorized)
            .count();
        assert!(alert_count >= violation_total);
    }

    #[tokio::test(start_paused = true)]
    async fn test_feed_loop_respects_cap() {
        let config = LiveFeedConfig {
            interval: Duration::from_secs(5),
            trigger_probability: 1.0,
            results_cap: 10,
        };
        let source = shared_source(9);
        let results = Arc::new(ResultStore::new());
        let alerts = Arc::new(AlertService::new(20));
        let feed = LiveFeedSimulator::new(config, source, results.clone(), alerts);

        feed.start().await;
        assert!(feed.is_running().await);

        // 13 ticks fire across 61 virtual seconds at probability 1.0
        tokio::time::sleep(Duration::from_secs(61)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        feed.stop().await;
        assert_eq!(results.count().await, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_production() {
        let config = LiveFeedConfig {
            interval: Duration::from_secs(5),
            trigger_probability: 1.0,
            results_cap: 10,
        };
        let source = shared_source(5);
        let results = Arc::new(ResultStore::new());
        let alerts = Arc::new(AlertService::new(20));
        let feed = LiveFeedSimulator::new(config, source, results.clone(), alerts);

        feed.start().await;
        tokio::time::sleep(Duration::from_secs(11)).await;
        feed.stop().await;
        // Let the loop observe the flag and exit
        tokio::time::sleep(Duration::from_secs(10)).await;

        let frozen = results.count().await;
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(results.count().await, frozen);
        assert!(!feed.is_running().await);
    }

    #[tokio::test]
    async fn test_start_twice_is_a_noop() {
        let source = shared_source(2);
        let results = Arc::new(ResultStore::new());
        let alerts = Arc::new(AlertService::new(20));
        let feed = LiveFeedSimulator::new(
            LiveFeedConfig::default(),
            source,
            results,
            alerts,
        );

        feed.start().await;
        feed.start().await;
        assert!(feed.is_running().await);
        feed.stop().await;
    }
}
