//! Request-path inference pipeline: decode, preprocess, forward pass,
//! and result formatting.
//!
//! Everything in this crate is deterministic and free of shared mutable
//! state; each request works on its own buffers.

pub mod preprocess;
pub mod predictor;

pub use predictor::Predictor;
pub use preprocess::Preprocessor;
