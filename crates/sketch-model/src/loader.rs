//! Startup-time model loading.
//!
//! Constructs the architecture described by the variant configuration,
//! loads the compact weights record onto the inference device, and hands
//! back a model that stays read-only for the rest of the process
//! lifetime. Any failure here is fatal: the process must not serve
//! without a working model.

use std::path::Path;

use burn::{module::Module, record::CompactRecorder, tensor::backend::Backend, tensor::Tensor};
use tracing::info;

use sketch_core::config::VariantConfig;
use sketch_core::error::{Error, Result};

use crate::cnn::{SketchClassifier, SketchClassifierConfig};

/// Build the architecture config for a variant with the given class count
pub fn model_config(variant: &VariantConfig, num_classes: usize) -> SketchClassifierConfig {
    SketchClassifierConfig::new()
        .with_num_classes(num_classes)
        .with_input_size(variant.input.width as usize)
        .with_in_channels(variant.input.channels as usize)
}

/// Load the classifier weights for a variant onto the given device.
///
/// Fails if the weights file is missing or its recorded shapes do not
/// match the constructed architecture.
pub fn load_model<B: Backend>(
    variant: &VariantConfig,
    num_classes: usize,
    device: &B::Device,
) -> Result<SketchClassifier<B>> {
    load_model_from_path(&variant.weights_path, variant, num_classes, device)
}

/// Load classifier weights from an explicit path
pub fn load_model_from_path<B: Backend>(
    weights: &Path,
    variant: &VariantConfig,
    num_classes: usize,
    device: &B::Device,
) -> Result<SketchClassifier<B>> {
    if !weights.exists() {
        return Err(Error::Model(format!(
            "weights file not found: {}",
            weights.display()
        )));
    }

    let config = model_config(variant, num_classes);
    let model = SketchClassifier::<B>::new(&config, device);

    let recorder = CompactRecorder::new();
    let model = model.load_file(weights, &recorder, device).map_err(|e| {
        Error::Model(format!(
            "failed to load weights from {}: {:?}",
            weights.display(),
            e
        ))
    })?;

    // One forward pass on a synthetic input proves the record matches the
    // constructed architecture before the first request arrives.
    let probe = Tensor::<B, 4>::zeros(
        [
            1,
            variant.input.channels as usize,
            variant.input.height as usize,
            variant.input.width as usize,
        ],
        device,
    );
    let dims = model.forward(probe).dims();
    if dims[1] != num_classes {
        return Err(Error::Model(format!(
            "weights from {} produce {} classes but {} were expected",
            weights.display(),
            dims[1],
            num_classes
        )));
    }

    info!(
        "model loaded: {} classes, input {}, weights {}",
        num_classes,
        variant.input,
        weights.display()
    );

    Ok(model)
}
