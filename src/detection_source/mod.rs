//! DetectionSource - Pluggable Detection Boundary
//!
//! ## Responsibilities
//!
//! - Define the seam behind which detection output is produced, so a real
//!   detector can replace the mock without touching the engine
//! - Provide the randomized mock generator that animates the dashboard
//! - Carry the fixed seed dataset used by the demo binary and tests

use crate::alert_service::{Alert, AlertType};
use crate::detection_builder::RawDetection;
use crate::models::{BoundingBox, DetectionResult, OcrResult, OverallStatus};
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

/// Producer of raw detection output
///
/// Implementations synthesize or receive one detection per call; the
/// caller runs it through the detection builder.
pub trait DetectionSource: Send {
    fn next_detection(&mut self) -> RawDetection;
}

/// A detection source shared between the live feed and the upload workflow
pub type SharedSource = std::sync::Arc<tokio::sync::Mutex<Box<dyn DetectionSource>>>;

const MOCK_IMAGES: [&str; 4] = [
    "https://images.unsplash.com/photo-1551808525-51a94da548ce?w=800&h=600&fit=crop",
    "https://images.unsplash.com/photo-1449824913935-59a10b8d2000?w=800&h=600&fit=crop",
    "https://images.unsplash.com/photo-1516321318423-f06f85e504b3?w=800&h=600&fit=crop",
    "https://images.unsplash.com/photo-1486406146926-c627a92ad1ab?w=800&h=600&fit=crop",
];

const MOCK_TEXTS: [(&str, bool); 5] = [
    ("McDonald's - I'm Lovin' It", true),
    ("ILLEGAL CRYPTO EXCHANGE", false),
    ("Starbucks Coffee", true),
    ("UNAUTHORIZED GAMBLING SITE", false),
    ("Apple - Think Different", true),
];

/// Randomized mock detection generator
///
/// Draws one OCR text from a fixed vocabulary, a confidence uniform in
/// [0.7, 1.0], and random region geometry. Stands in for the real
/// detection backend this dashboard does not have.
pub struct MockDetectionSource {
    rng: StdRng,
}

impl MockDetectionSource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic source for tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn random_bbox(&mut self, confidence: f64) -> BoundingBox {
        BoundingBox {
            x: 50.0 + self.rng.gen::<f64>() * 200.0,
            y: 50.0 + self.rng.gen::<f64>() * 150.0,
            width: 150.0 + self.rng.gen::<f64>() * 200.0,
            height: 100.0 + self.rng.gen::<f64>() * 150.0,
            confidence,
            class: "advertisement".to_string(),
        }
    }
}

impl Default for MockDetectionSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionSource for MockDetectionSource {
    fn next_detection(&mut self) -> RawDetection {
        let (text, authorized) = MOCK_TEXTS[self.rng.gen_range(0..MOCK_TEXTS.len())];
        let image_url = MOCK_IMAGES[self.rng.gen_range(0..MOCK_IMAGES.len())];
        let confidence = 0.7 + self.rng.gen::<f64>() * 0.3;

        let bounding_box = self.random_bbox(confidence);
        let ocr_result = OcrResult {
            text: text.to_string(),
            confidence,
            is_authorized: authorized,
            bounding_box: bounding_box.clone(),
        };

        RawDetection {
            image_url: image_url.to_string(),
            bounding_boxes: vec![bounding_box],
            ocr_results: vec![ocr_result],
            processing_time: 1.0 + self.rng.gen::<f64>() * 3.0,
        }
    }
}

// ========================================
// Seed Dataset
// ========================================

fn seed_bbox(x: f64, y: f64, width: f64, height: f64, confidence: f64) -> BoundingBox {
    BoundingBox {
        x,
        y,
        width,
        height,
        confidence,
        class: "advertisement".to_string(),
    }
}

/// Fixed demo detection results, newest first
pub fn sample_results() -> Vec<DetectionResult> {
    let crypto_box = seed_bbox(150.0, 100.0, 200.0, 150.0, 0.92);
    let nike_box = seed_bbox(400.0, 200.0, 180.0, 120.0, 0.87);
    let cola_box = seed_bbox(100.0, 50.0, 300.0, 200.0, 0.96);
    let gambling_box = seed_bbox(80.0, 120.0, 250.0, 180.0, 0.88);

    vec![
        DetectionResult {
            id: Uuid::new_v4().to_string(),
            image_url: MOCK_IMAGES[0].to_string(),
            timestamp: Utc::now() - Duration::minutes(2),
            overall_status: OverallStatus::Unauthorized,
            processing_time: 2.3,
            bounding_boxes: vec![crypto_box.clone(), nike_box.clone()],
            ocr_results: vec![
                OcrResult {
                    text: "UNAUTHORIZED CRYPTO AD - Buy Bitcoin Now!".to_string(),
                    confidence: 0.94,
                    is_authorized: false,
                    bounding_box: crypto_box,
                },
                OcrResult {
                    text: "Nike - Just Do It".to_string(),
                    confidence: 0.89,
                    is_authorized: true,
                    bounding_box: nike_box,
                },
            ],
        },
        DetectionResult {
            id: Uuid::new_v4().to_string(),
            image_url: MOCK_IMAGES[1].to_string(),
            timestamp: Utc::now() - Duration::minutes(5),
            overall_status: OverallStatus::Authorized,
            processing_time: 1.8,
            bounding_boxes: vec![cola_box.clone()],
            ocr_results: vec![OcrResult {
                text: "Coca-Cola - Taste the Feeling".to_string(),
                confidence: 0.97,
                is_authorized: true,
                bounding_box: cola_box,
            }],
        },
        DetectionResult {
            id: Uuid::new_v4().to_string(),
            image_url: MOCK_IMAGES[2].to_string(),
            timestamp: Utc::now() - Duration::minutes(10),
            overall_status: OverallStatus::Unauthorized,
            processing_time: 3.1,
            bounding_boxes: vec![gambling_box.clone()],
            ocr_results: vec![OcrResult {
                text: "ILLEGAL GAMBLING SITE - WIN BIG NOW!!!".to_string(),
                confidence: 0.91,
                is_authorized: false,
                bounding_box: gambling_box,
            }],
        },
    ]
}

/// Fixed demo alerts, newest first
pub fn sample_alerts() -> Vec<Alert> {
    vec![
        Alert {
            id: Uuid::new_v4().to_string(),
            alert_type: AlertType::Violation,
            title: "Unauthorized Advertisement Detected".to_string(),
            message: "Cryptocurrency advertisement found without proper licensing".to_string(),
            timestamp: Utc::now() - Duration::seconds(30),
            image_url: Some(MOCK_IMAGES[0].to_string()),
            ocr_text: Some("Buy Bitcoin Now!".to_string()),
            confidence: Some(0.94),
            is_read: false,
        },
        Alert {
            id: Uuid::new_v4().to_string(),
            alert_type: AlertType::Warning,
            title: "Low Confidence Detection".to_string(),
            message: "Advertisement detected with low confidence score".to_string(),
            timestamp: Utc::now() - Duration::minutes(3),
            image_url: Some(MOCK_IMAGES[2].to_string()),
            ocr_text: Some("Unclear text detected".to_string()),
            confidence: Some(0.62),
            is_read: false,
        },
        Alert {
            id: Uuid::new_v4().to_string(),
            alert_type: AlertType::Violation,
            title: "Gambling Advertisement".to_string(),
            message: "Illegal gambling content detected in urban area".to_string(),
            timestamp: Utc::now() - Duration::minutes(7),
            image_url: Some(MOCK_IMAGES[2].to_string()),
            ocr_text: Some("WIN BIG NOW!!!".to_string()),
            confidence: Some(0.91),
            is_read: true,
        },
    ]
}
