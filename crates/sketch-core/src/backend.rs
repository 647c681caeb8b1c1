//! Inference backend selection for the Burn framework.
//!
//! Inference runs on a backend without autodiff, which disables gradient
//! tracking and dropout and makes batch norm use its running statistics.
//! The CPU NdArray backend is the default; the `cuda` feature switches
//! the whole service to the GPU backend at compile time.

#[cfg(feature = "cuda")]
pub type InferenceBackend = burn_cuda::Cuda;

#[cfg(not(feature = "cuda"))]
pub type InferenceBackend = burn_ndarray::NdArray;

/// Get the default device for the selected backend
pub fn default_device() -> <InferenceBackend as burn::tensor::backend::Backend>::Device {
    <InferenceBackend as burn::tensor::backend::Backend>::Device::default()
}

/// Get a human-readable name for the current backend
pub fn backend_name() -> &'static str {
    if cfg!(feature = "cuda") {
        "CUDA (GPU)"
    } else {
        "NdArray (CPU)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_device() {
        // Just ensure device construction doesn't panic
        let _ = default_device();
    }

    #[test]
    fn test_backend_name() {
        assert!(!backend_name().is_empty());
    }
}
