//! Application state
//!
//! Holds all shared components and state

use crate::alert_service::AlertService;
use crate::detection_source::{DetectionSource, MockDetectionSource, SharedSource};
use crate::live_feed::{LiveFeedConfig, LiveFeedSimulator};
use crate::result_store::ResultStore;
use crate::upload_workflow::{UploadConfig, UploadWorkflow};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Application configuration
///
/// All retention caps and timings live here; call sites never carry their
/// own literals.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Live feed settings
    pub feed: LiveFeedConfig,
    /// Upload workflow settings
    pub upload: UploadConfig,
    /// Alert log capacity
    pub alert_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        let feed = LiveFeedConfig {
            interval: Duration::from_secs(env_or("FEED_INTERVAL_SECS", 5)),
            trigger_probability: env_or("FEED_TRIGGER_PROBABILITY", 0.1),
            results_cap: env_or("FEED_RESULTS_CAP", 10),
        };
        let upload = UploadConfig {
            max_file_bytes: env_or("UPLOAD_MAX_BYTES", 10 * 1024 * 1024),
            ..UploadConfig::default()
        };

        Self {
            feed,
            upload,
            alert_capacity: env_or("ALERT_CAPACITY", 20),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Application state shared across the presentation layer
#[derive(Clone)]
pub struct AppState {
    /// Application config
    pub config: AppConfig,
    /// Detection result log
    pub results: Arc<ResultStore>,
    /// Alert deriver and log
    pub alerts: Arc<AlertService>,
    /// Live feed simulator
    pub feed: Arc<LiveFeedSimulator>,
    /// Manual upload workflow
    pub upload: Arc<UploadWorkflow>,
}

impl AppState {
    /// Create new AppState backed by the randomized mock source
    pub fn new(config: AppConfig) -> Self {
        Self::with_source(config, Box::new(MockDetectionSource::new()))
    }

    /// Create new AppState with a custom detection source
    ///
    /// The seam for swapping in a real detector (or a deterministic test
    /// double) without touching the engine.
    pub fn with_source(config: AppConfig, source: Box<dyn DetectionSource>) -> Self {
        let source: SharedSource = Arc::new(Mutex::new(source));
        let results = Arc::new(ResultStore::new());
        let alerts = Arc::new(AlertService::new(config.alert_capacity));
        let feed = Arc::new(LiveFeedSimulator::new(
            config.feed.clone(),
            source.clone(),
            results.clone(),
            alerts.clone(),
        ));
        let upload = Arc::new(UploadWorkflow::new(
            config.upload.clone(),
            source,
            results.clone(),
        ));

        Self {
            config,
            results,
            alerts,
            feed,
            upload,
        }
    }
}
