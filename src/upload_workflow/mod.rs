//! UploadWorkflow - Manual Image Upload Simulation
//!
//! ## Responsibilities
//!
//! - Validate uploaded files (extension, size cap) before any work starts
//! - Report monotonically increasing progress in discrete steps
//! - Produce a detection result through the source and the builder,
//!   appended unbounded (retention caps apply to the live feed only)
//!
//! All delays are plain configuration values so tests run the whole
//! workflow at zero wall-clock cost.

use crate::detection_builder;
use crate::detection_source::SharedSource;
use crate::error::{Error, Result};
use crate::models::DetectionResult;
use crate::result_store::ResultStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::sleep;

/// File extensions accepted for analysis
const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Ephemeral upload progress state
///
/// Reset to idle at the start and end of every upload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadProgress {
    pub is_uploading: bool,
    /// Percentage in [0,100]
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// Upload workflow configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Progress increment per step, in percent
    pub progress_step: u8,
    /// Simulated transfer delay per step
    pub step_delay: Duration,
    /// Simulated analysis delay after transfer completes
    pub processing_delay: Duration,
    /// Maximum accepted file size in bytes
    pub max_file_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            progress_step: 10,
            step_delay: Duration::from_millis(200),
            processing_delay: Duration::from_secs(1),
            max_file_bytes: 10 * 1024 * 1024,
        }
    }
}

/// UploadWorkflow instance
pub struct UploadWorkflow {
    config: UploadConfig,
    source: SharedSource,
    results: Arc<ResultStore>,
    progress: RwLock<UploadProgress>,
}

impl UploadWorkflow {
    /// Create new UploadWorkflow
    pub fn new(config: UploadConfig, source: SharedSource, results: Arc<ResultStore>) -> Self {
        Self {
            config,
            source,
            results,
            progress: RwLock::new(UploadProgress::default()),
        }
    }

    /// Current progress snapshot
    pub async fn progress(&self) -> UploadProgress {
        self.progress.read().await.clone()
    }

    /// Process one uploaded file
    ///
    /// Validates, simulates transfer and analysis, appends the produced
    /// result unbounded and returns it. One upload at a time; a second
    /// call while uploading is rejected.
    pub async fn upload(&self, file_name: &str, file_size: u64) -> Result<DetectionResult> {
        validate_file(file_name, file_size, self.config.max_file_bytes)?;

        {
            let mut progress = self.progress.write().await;
            if progress.is_uploading {
                return Err(Error::InvalidInput(
                    "another upload is already in progress".to_string(),
                ));
            }
            *progress = UploadProgress {
                is_uploading: true,
                progress: 0,
                file_name: Some(file_name.to_string()),
            };
        }

        tracing::info!(file_name = %file_name, size = file_size, "Upload started");

        // Simulated transfer, monotone progress
        let step = self.config.progress_step.max(1);
        let mut pct = 0u8;
        loop {
            {
                let mut progress = self.progress.write().await;
                progress.progress = pct;
            }
            if pct == 100 {
                break;
            }
            sleep(self.config.step_delay).await;
            pct = pct.saturating_add(step).min(100);
        }

        // Simulated analysis
        sleep(self.config.processing_delay).await;

        let raw = {
            let mut source = self.source.lock().await;
            source.next_detection()
        };

        let result = match detection_builder::build_raw(raw) {
            Ok(result) => result,
            Err(e) => {
                self.reset().await;
                return Err(e);
            }
        };

        self.results.append(result.clone()).await;
        self.reset().await;

        tracing::info!(
            file_name = %file_name,
            id = %result.id,
            status = %result.overall_status,
            "Upload processed"
        );

        Ok(result)
    }

    async fn reset(&self) {
        let mut progress = self.progress.write().await;
        *progress = UploadProgress::default();
    }
}

/// Validate file name and size before any work starts
fn validate_file(file_name: &str, file_size: u64, max_bytes: u64) -> Result<()> {
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {}
        _ => {
            return Err(Error::InvalidInput(format!(
                "unsupported file type for \"{file_name}\"; expected one of {ALLOWED_EXTENSIONS:?}"
            )));
        }
    }

    if file_size > max_bytes {
        return Err(Error::InvalidInput(format!(
            "file \"{file_name}\" is {file_size} bytes, limit is {max_bytes}"
        )));
    }

    Ok(())
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

    fn zero_delay_config() -> UploadConfig {
        UploadConfig {
            step_delay: Duration::ZERO,
            processing_delay: Duration::ZERO,
            ..UploadConfig::default()
        }
    }

    fn workflow(seed: u64, config: UploadConfig) -> (Arc<UploadWorkflow>, Arc<ResultStore>) {
        let results = Arc::new(ResultStore::new());
        let workflow = Arc::new(UploadWorkflow::new(
            config,
            shared_source(seed),
            results.clone(),
        ));
        (workflow, results)
    }

    #[tokio::test]
    async fn test_upload_appends_result_and_resets_progress() {
        let (workflow, results) = workflow(42, zero_delay_config());

        let result = workflow.upload("billboard.jpg", 1024).await.unwrap();
        assert_eq!(results.count().await, 1);
        assert_eq!(results.snapshot().await[0].id, result.id);

        let progress = workflow.progress().await;
        assert!(!progress.is_uploading);
        assert_eq!(progress.progress, 0);
        assert!(progress.file_name.is_none());
    }

    #[tokio::test]
    async fn test_uploads_are_unbounded() {
        let (workflow, results) = workflow(7, zero_delay_config());
        for i in 0..15 {
            workflow
                .upload(&format!("street-{i}.png"), 2048)
                .await
                .unwrap();
        }
        assert_eq!(results.count().await, 15);
    }

    #[tokio::test]
    async fn test_rejects_unsupported_extension() {
        let (workflow, results) = workflow(1, zero_delay_config());
        let err = workflow.upload("notes.txt", 512).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(results.count().await, 0);
        assert!(!workflow.progress().await.is_uploading);
    }

    #[tokio::test]
    async fn test_rejects_oversized_file() {
        let (workflow, results) = workflow(1, zero_delay_config());
        let err = workflow
            .upload("huge.jpg", 11 * 1024 * 1024)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(results.count().await, 0);
    }

    #[tokio::test]
    async fn test_extension_check_is_case_insensitive() {
        let (workflow, _) = workflow(3, zero_delay_config());
        workflow.upload("PHOTO.JPG", 1024).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_upload_rejected_while_uploading() {
        let config = UploadConfig {
            step_delay: Duration::from_millis(200),
            processing_delay: Duration::from_secs(1),
            ..UploadConfig::default()
        };
        let (workflow, results) = workflow(5, config);

        let first = {
            let workflow = workflow.clone();
            tokio::spawn(async move { workflow.upload("first.jpg", 1024).await })
        };

        // Let the first upload claim the progress state
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(workflow.progress().await.is_uploading);

        let err = workflow.upload("second.jpg", 1024).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        first.await.unwrap().unwrap();
        assert_eq!(results.count().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_is_monotone() {
        let config = UploadConfig {
            step_delay: Duration::from_millis(200),
            processing_delay: Duration::from_millis(500),
            ..UploadConfig::default()
        };
        let (workflow, _) = workflow(9, config);

        let handle = {
            let workflow = workflow.clone();
            tokio::spawn(async move { workflow.upload("watch.webp", 4096).await })
        };

        let mut last = 0u8;
        let mut samples = 0;
        while samples < 1000 {
            let progress = workflow.progress().await;
            if progress.is_uploading {
                assert!(progress.progress >= last);
                last = progress.progress;
            }
            if handle.is_finished() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
            samples += 1;
        }

        assert_eq!(last, 100);
        handle.await.unwrap().unwrap();
    }
}
