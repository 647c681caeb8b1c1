//! Application state for the sketch inference server.
//!
//! The model and label table are loaded once at startup and never
//! mutated afterwards, so request handlers share them without locks.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use sketch_core::backend::InferenceBackend;
use sketch_pipeline::Predictor;

/// Serving options fixed at startup
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// Whether /predict answers quiz rounds instead of raw classification
    pub quiz_mode: bool,
    /// Whether to echo the upload back as a base64 data URI
    pub echo_image: bool,
    /// Directory uploads are copied into, for debugging
    pub upload_dir: Option<PathBuf>,
}

/// Shared application state
pub struct AppState {
    /// The loaded model variant, read-only after startup
    pub predictor: Predictor<InferenceBackend>,
    /// Serving options
    pub options: ServeOptions,
    /// Server start time
    pub started_at: Instant,
}

impl AppState {
    pub fn new(predictor: Predictor<InferenceBackend>, options: ServeOptions) -> Self {
        Self {
            predictor,
            options,
            started_at: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

pub type SharedState = Arc<AppState>;
