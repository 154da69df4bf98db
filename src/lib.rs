//! DeepSight Core Library
//!
//! Detection result engine for the DeepSight advertisement monitoring
//! dashboard.
//!
//! ## Architecture (7 Components)
//!
//! 1. DetectionBuilder - Raw detection validation and normalization
//! 2. ResultStore - Ordered detection result log (newest first)
//! 3. AlertService - Violation alert derivation and bounded log
//! 4. ViewProjection - Pure filter/sort/search/stats functions
//! 5. DetectionSource - Pluggable detection boundary (mock generator)
//! 6. LiveFeedSimulator - Timer-driven Bernoulli-trial mock feed
//! 7. UploadWorkflow - Manual upload simulation with progress reporting
//!
//! ## Design Principles
//!
//! - One-way data flow: raw detections -> builder -> stores -> projections
//! - Stores are explicit objects shared through AppState, never globals
//! - Retention caps are configuration, applied by callers, not store
//!   invariants

pub mod alert_service;
pub mod detection_builder;
pub mod detection_source;
pub mod error;
pub mod live_feed;
pub mod models;
pub mod result_store;
pub mod state;
pub mod upload_workflow;
pub mod view_projection;

pub use error::{Error, Result};
pub use state::{AppConfig, AppState};
