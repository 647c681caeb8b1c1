//! Core types and utilities for the sketch classification service.
//!
//! This crate provides the foundational types shared across the sketch
//! quiz project: error handling, the class label table, variant
//! configuration, and inference backend selection.

pub mod backend;
pub mod config;
pub mod error;
pub mod labels;
pub mod types;

pub use config::{Normalization, VariantConfig};
pub use error::{Error, Result};
pub use labels::LabelTable;
pub use types::{ImageDimensions, Prediction, QuizVerdict};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
