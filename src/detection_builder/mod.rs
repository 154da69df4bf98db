//! DetectionBuilder - Raw Detection Normalization
//!
//! ## Responsibilities
//!
//! - Validate raw per-object detections (confidence ranges, geometry,
//!   OCR-to-region membership)
//! - Assign fresh ids and timestamps
//! - Derive the aggregate authorization status for the image

use crate::error::{Error, Result};
use crate::models::{BoundingBox, DetectionResult, OcrResult, OverallStatus};
use chrono::Utc;
use uuid::Uuid;

/// Raw per-image detection output, as handed over by a detection source
///
/// Transport type only; nothing here is validated until it passes
/// through [`build`].
#[derive(Debug, Clone)]
pub struct RawDetection {
    pub image_url: String,
    pub bounding_boxes: Vec<BoundingBox>,
    pub ocr_results: Vec<OcrResult>,
    /// Processing time in seconds
    pub processing_time: f64,
}

/// Derive the aggregate status from the per-object authorization flags
///
/// Unauthorized dominates: a single unauthorized OCR entry anywhere in the
/// image marks the whole image unauthorized. An empty OCR list means no
/// text has been extracted yet and the image is still pending.
pub fn overall_status(ocr_results: &[OcrResult]) -> OverallStatus {
    if ocr_results.is_empty() {
        OverallStatus::Pending
    } else if ocr_results.iter().any(|o| !o.is_authorized) {
        OverallStatus::Unauthorized
    } else {
        OverallStatus::Authorized
    }
}

/// Build a normalized [`DetectionResult`] from raw detection output
///
/// Rejects malformed input with [`Error::InvalidInput`] before
/// construction; nothing is clamped silently.
pub fn build(
    bounding_boxes: Vec<BoundingBox>,
    ocr_results: Vec<OcrResult>,
    image_url: impl Into<String>,
    processing_time: f64,
) -> Result<DetectionResult> {
    if !processing_time.is_finite() || processing_time < 0.0 {
        return Err(Error::InvalidInput(format!(
            "processing_time must be a non-negative number of seconds, got {processing_time}"
        )));
    }

    for bbox in &bounding_boxes {
        validate_bounding_box(bbox)?;
    }

    for ocr in &ocr_results {
        validate_confidence(ocr.confidence, "OCR confidence")?;
        validate_bounding_box(&ocr.bounding_box)?;
        if !bounding_boxes.contains(&ocr.bounding_box) {
            return Err(Error::InvalidInput(format!(
                "OCR result \"{}\" references a bounding box that is not part of the detection",
                ocr.text
            )));
        }
    }

    let status = overall_status(&ocr_results);
    let result = DetectionResult {
        id: Uuid::new_v4().to_string(),
        image_url: image_url.into(),
        timestamp: Utc::now(),
        bounding_boxes,
        ocr_results,
        overall_status: status,
        processing_time,
    };

    tracing::debug!(
        id = %result.id,
        status = %result.overall_status,
        regions = result.bounding_boxes.len(),
        ocr_entries = result.ocr_results.len(),
        "Detection result built"
    );

    Ok(result)
}

/// Build from a [`RawDetection`] bundle
pub fn build_raw(raw: RawDetection) -> Result<DetectionResult> {
    build(
        raw.bounding_boxes,
        raw.ocr_results,
        raw.image_url,
        raw.processing_time,
    )
}

fn validate_bounding_box(bbox: &BoundingBox) -> Result<()> {
    for (name, value) in [
        ("x", bbox.x),
        ("y", bbox.y),
        ("width", bbox.width),
        ("height", bbox.height),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidInput(format!(
                "bounding box {name} must be non-negative, got {value}"
            )));
        }
    }
    validate_confidence(bbox.confidence, "bounding box confidence")
}

fn validate_confidence(value: f64, what: &str) -> Result<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(Error::InvalidInput(format!(
            "{what} must lie in [0,1], got {value}"
        )));
    }
    Ok(())
}
