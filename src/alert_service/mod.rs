//! AlertService - Violation Alert Derivation and Log
//!
//! ## Responsibilities
//!
//! - Derive violation alerts from newly built detection results
//! - Own the bounded, ordered alert log (newest first)
//! - Mark-as-read / dismiss / mark-all-as-read mutations
//!
//! Unknown alert ids on mutation are no-ops, not errors; the consuming
//! panel may race a dismissal against a background refresh and must not
//! blow up when it loses.

use crate::models::{DetectionResult, OverallStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Alert severity class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Violation,
    Warning,
    Info,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Violation => "violation",
            AlertType::Warning => "warning",
            AlertType::Info => "info",
        }
    }
}

/// Violation notification surfaced to the end user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub alert_type: AlertType,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub is_read: bool,
}

/// AlertService instance
pub struct AlertService {
    log: RwLock<VecDeque<Alert>>,
    capacity: usize,
}

impl AlertService {
    /// Create new AlertService with the given log capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            log: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Derive an alert from a newly built result
    ///
    /// Emits a violation alert if and only if the result is unauthorized.
    /// Alert detail fields come from the first OCR entry; the message
    /// falls back to "Unknown" if the OCR list is empty despite the
    /// unauthorized status.
    pub async fn on_new_result(&self, result: &DetectionResult) -> Option<Alert> {
        if result.overall_status != OverallStatus::Unauthorized {
            return None;
        }

        let first_ocr = result.ocr_results.first();
        let offending_text = first_ocr.map(|o| o.text.as_str()).unwrap_or("Unknown");

        let alert = Alert {
            id: Uuid::new_v4().to_string(),
            alert_type: AlertType::Violation,
            title: "New Violation Detected".to_string(),
            message: format!("Unauthorized advertisement: \"{offending_text}\""),
            timestamp: Utc::now(),
            image_url: Some(result.image_url.clone()),
            ocr_text: first_ocr.map(|o| o.text.clone()),
            confidence: first_ocr.map(|o| o.confidence),
            is_read: false,
        };

        tracing::info!(
            alert_id = %alert.id,
            result_id = %result.id,
            ocr_text = %offending_text,
            "Violation alert raised"
        );

        self.push(alert.clone()).await;
        Some(alert)
    }

    /// Insert an externally constructed alert, applying the retention cap
    ///
    /// Used for seeding demo data; derived alerts go through
    /// [`AlertService::on_new_result`].
    pub async fn push(&self, alert: Alert) {
        let mut log = self.log.write().await;
        log.push_front(alert);
        while log.len() > self.capacity {
            if let Some(evicted) = log.pop_back() {
                tracing::debug!(alert_id = %evicted.id, "Oldest alert evicted");
            }
        }
    }

    /// Mark one alert as read
    ///
    /// Idempotent; unknown ids are a no-op.
    pub async fn mark_as_read(&self, alert_id: &str) {
        let mut log = self.log.write().await;
        if let Some(alert) = log.iter_mut().find(|a| a.id == alert_id) {
            if !alert.is_read {
                alert.is_read = true;
                tracing::debug!(alert_id = %alert_id, "Alert marked as read");
            }
        }
    }

    /// Remove one alert from the log
    ///
    /// Unknown ids are a no-op.
    pub async fn dismiss(&self, alert_id: &str) {
        let mut log = self.log.write().await;
        let before = log.len();
        log.retain(|a| a.id != alert_id);
        if log.len() < before {
            tracing::debug!(alert_id = %alert_id, "Alert dismissed");
        }
    }

    /// Mark every alert as read in one atomic step
    pub async fn mark_all_as_read(&self) {
        let mut log = self.log.write().await;
        let mut marked = 0;
        for alert in log.iter_mut() {
            if !alert.is_read {
                alert.is_read = true;
                marked += 1;
            }
        }
        if marked > 0 {
            tracing::debug!(marked = marked, "All alerts marked as read");
        }
    }

    /// Snapshot of the alert log, newest first
    pub async fn snapshot(&self) -> Vec<Alert> {
        self.log.read().await.iter().cloned().collect()
    }

    /// Number of stored alerts
    pub async fn count(&self) -> usize {
        self.log.read().await.len()
    }

    /// Number of unread alerts
    pub async fn unread_count(&self) -> usize {
        self.log.read().await.iter().filter(|a| !a.is_read).count()
    }
}
