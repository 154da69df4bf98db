//! Shared models and types for DeepSight Core
//!
//! This module contains the detection data model shared across multiple
//! modules to avoid circular dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One candidate advertisement region identified in an image
///
/// Pure value type; compared by value when OCR results are matched
/// against the region list they were extracted from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Detector confidence in [0,1]
    pub confidence: f64,
    /// Detector class label (e.g. "advertisement")
    pub class: String,
}

/// Extracted text plus authorization verdict for one detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrResult {
    pub text: String,
    /// OCR confidence in [0,1]
    pub confidence: f64,
    pub is_authorized: bool,
    pub bounding_box: BoundingBox,
}

/// Aggregate authorization verdict for an entire image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Authorized,
    Unauthorized,
    Pending,
}

impl OverallStatus {
    /// Stable label, also used as the lexicographic sort key
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Authorized => "authorized",
            OverallStatus::Unauthorized => "unauthorized",
            OverallStatus::Pending => "pending",
        }
    }
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized per-image detection record
///
/// Created once by the detection builder and immutable thereafter;
/// removed only by capped-log eviction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    pub id: String,
    pub image_url: String,
    pub timestamp: DateTime<Utc>,
    pub bounding_boxes: Vec<BoundingBox>,
    pub ocr_results: Vec<OcrResult>,
    pub overall_status: OverallStatus,
    /// Processing time in seconds
    pub processing_time: f64,
}

impl DetectionResult {
    /// Arithmetic mean of the OCR confidences
    ///
    /// An empty OCR list yields 0.0. This is the defined convention for
    /// the confidence sort key; pending results sort below any result
    /// that carries extracted text.
    pub fn mean_confidence(&self) -> f64 {
        if self.ocr_results.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.ocr_results.iter().map(|o| o.confidence).sum();
        sum / self.ocr_results.len() as f64
    }

    /// Number of unauthorized OCR entries in this result
    pub fn violation_count(&self) -> usize {
        self.ocr_results.iter().filter(|o| !o.is_authorized).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox() -> BoundingBox {
        BoundingBox {
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 50.0,
            confidence: 0.9,
            class: "advertisement".to_string(),
        }
    }

    fn result_with_confidences(confidences: &[f64]) -> DetectionResult {
        DetectionResult {
            id: "r1".to_string(),
            image_url: "https://example.com/a.jpg".to_string(),
            timestamp: Utc::now(),
            bounding_boxes: vec![bbox()],
            ocr_results: confidences
                .iter()
                .map(|&c| OcrResult {
                    text: "text".to_string(),
                    confidence: c,
                    is_authorized: true,
                    bounding_box: bbox(),
                })
                .collect(),
            overall_status: OverallStatus::Authorized,
            processing_time: 1.0,
        }
    }

    #[test]
    fn test_mean_confidence() {
        let result = result_with_confidences(&[0.8, 0.6]);
        assert!((result.mean_confidence() - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_mean_confidence_empty_is_zero() {
        let result = result_with_confidences(&[]);
        assert_eq!(result.mean_confidence(), 0.0);
    }

    #[test]
    fn test_violation_count() {
        let mut result = result_with_confidences(&[0.9, 0.8]);
        result.ocr_results[1].is_authorized = false;
        assert_eq!(result.violation_count(), 1);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(OverallStatus::Authorized.as_str(), "authorized");
        assert_eq!(OverallStatus::Unauthorized.as_str(), "unauthorized");
        assert_eq!(OverallStatus::Pending.as_str(), "pending");
    }

    #[test]
    fn test_status_serde_lowercase() {
        let json = serde_json::to_string(&OverallStatus::Unauthorized).unwrap();
        assert_eq!(json, "\"unauthorized\"");
    }
}
