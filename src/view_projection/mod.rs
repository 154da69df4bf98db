//! ViewProjection - Derived Views over Result and Alert Logs
//!
//! ## Responsibilities
//!
//! - Status/search filtering and stable sorting of detection results
//! - Alert filtering by type and read state
//! - Aggregate statistics for the dashboard tiles
//! - JSON export of a result snapshot
//!
//! Everything here is a pure function over caller-supplied snapshots;
//! nothing holds state between calls.

use crate::alert_service::{Alert, AlertType};
use crate::error::Result;
use crate::models::{DetectionResult, OverallStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Status filter for result views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(OverallStatus),
}

/// Alert type filter for alert views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertTypeFilter {
    All,
    Only(AlertType),
}

/// Sortable result columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Timestamp,
    Confidence,
    Status,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Dashboard result statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultStats {
    pub total: usize,
    pub violations: usize,
    pub authorized: usize,
    pub pending: usize,
    /// Mean processing time in seconds; 0.0 over an empty result set
    pub avg_processing_time: f64,
}

/// Alert center statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertStats {
    pub total: usize,
    pub unread: usize,
    pub by_type: HashMap<AlertType, usize>,
}

/// Filter results by status and OCR text search
///
/// The status filter is an exact match unless `All`. A non-empty search
/// term matches case-insensitively against any OCR text substring in the
/// result; a result with no OCR entries never matches a non-empty term.
/// Input order is preserved.
pub fn filter_results(
    results: &[DetectionResult],
    status: StatusFilter,
    search_term: Option<&str>,
) -> Vec<DetectionResult> {
    let term = search_term
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase());

    results
        .iter()
        .filter(|r| match status {
            StatusFilter::All => true,
            StatusFilter::Only(s) => r.overall_status == s,
        })
        .filter(|r| match &term {
            None => true,
            Some(term) => r
                .ocr_results
                .iter()
                .any(|o| o.text.to_lowercase().contains(term.as_str())),
        })
        .cloned()
        .collect()
}

/// Sort results by the given field and direction
///
/// The confidence key is the mean OCR confidence (0.0 for an empty OCR
/// list); the status key is the lexicographic status label; the timestamp
/// key is chronological. The sort is stable: ties keep their original
/// relative order.
pub fn sort_results(
    results: &[DetectionResult],
    field: SortField,
    direction: SortDirection,
) -> Vec<DetectionResult> {
    let mut sorted = results.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = match field {
            SortField::Timestamp => a.timestamp.cmp(&b.timestamp),
            SortField::Confidence => a.mean_confidence().total_cmp(&b.mean_confidence()),
            SortField::Status => a.overall_status.as_str().cmp(b.overall_status.as_str()),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    sorted
}

/// Filter alerts by type; exact match unless `All`. Order preserved.
pub fn filter_alerts(alerts: &[Alert], filter: AlertTypeFilter) -> Vec<Alert> {
    alerts
        .iter()
        .filter(|a| match filter {
            AlertTypeFilter::All => true,
            AlertTypeFilter::Only(t) => a.alert_type == t,
        })
        .cloned()
        .collect()
}

/// The unread-only view of the alert panel
pub fn filter_unread(alerts: &[Alert]) -> Vec<Alert> {
    alerts.iter().filter(|a| !a.is_read).cloned().collect()
}

/// Aggregate statistics over a result snapshot
///
/// The average over an empty set is 0.0, never a division fault.
pub fn compute_stats(results: &[DetectionResult]) -> ResultStats {
    let total = results.len();
    let violations = results
        .iter()
        .filter(|r| r.overall_status == OverallStatus::Unauthorized)
        .count();
    let authorized = results
        .iter()
        .filter(|r| r.overall_status == OverallStatus::Authorized)
        .count();
    let pending = results
        .iter()
        .filter(|r| r.overall_status == OverallStatus::Pending)
        .count();
    let avg_processing_time = if total == 0 {
        0.0
    } else {
        results.iter().map(|r| r.processing_time).sum::<f64>() / total as f64
    };

    ResultStats {
        total,
        violations,
        authorized,
        pending,
        avg_processing_time,
    }
}

/// Aggregate statistics over an alert snapshot
pub fn compute_alert_stats(alerts: &[Alert]) -> AlertStats {
    let mut by_type = HashMap::new();
    for alert in alerts {
        *by_type.entry(alert.alert_type).or_insert(0) += 1;
    }

    AlertStats {
        total: alerts.len(),
        unread: alerts.iter().filter(|a| !a.is_read).count(),
        by_type,
    }
}

/// Serialize a result snapshot as pretty JSON
///
/// Backs the table's export action; the caller decides where the string
/// goes.
pub fn export_results_json(results: &[DetectionResult]) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}
