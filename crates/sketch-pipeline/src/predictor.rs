//! Prediction and result formatting.
//!
//! The [`Predictor`] owns the loaded model, the label table, and the
//! preprocessor for one variant. Per request it runs the linear
//! pipeline: decode, preprocess, forward pass, softmax over the full
//! class distribution, then top-K selection. Input tensors are created
//! on the same device the model was loaded onto, so model and input can
//! never disagree about placement at request time.

use burn::tensor::backend::Backend;

use sketch_core::config::VariantConfig;
use sketch_core::error::{Error, Result};
use sketch_core::labels::LabelTable;
use sketch_core::types::{Prediction, QuizVerdict};
use sketch_model::SketchClassifier;

use crate::preprocess::Preprocessor;

/// Scale factor keeping four decimal places in reported probabilities
const PROBABILITY_SCALE: f32 = 10_000.0;

/// Round a probability to four decimal places for output stability
pub fn round_probability(p: f32) -> f32 {
    (p * PROBABILITY_SCALE).round() / PROBABILITY_SCALE
}

/// Predictor for a single loaded model variant
pub struct Predictor<B: Backend> {
    model: SketchClassifier<B>,
    labels: LabelTable,
    preprocessor: Preprocessor,
    device: B::Device,
    top_k: usize,
}

impl<B: Backend> Predictor<B> {
    /// Creates a predictor, checking the label table against the model's
    /// output dimensionality.
    pub fn new(
        model: SketchClassifier<B>,
        labels: LabelTable,
        variant: &VariantConfig,
        device: B::Device,
    ) -> Result<Self> {
        labels.ensure_matches(model.num_classes())?;

        Ok(Self {
            preprocessor: Preprocessor::new(variant),
            top_k: variant.top_k,
            model,
            labels,
            device,
        })
    }

    /// Number of predictions returned per request
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// The label table serving this variant
    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Softmax probabilities over the full class set for one image
    pub fn probabilities(&self, bytes: &[u8]) -> Result<Vec<f32>> {
        let input = self.preprocessor.prepare_tensor::<B>(bytes, &self.device)?;
        let output = self.model.forward_softmax(input);

        output
            .into_data()
            .to_vec()
            .map_err(|e| Error::Inference(format!("failed to read output tensor: {:?}", e)))
    }

    /// Top-K predictions for one image, highest probability first
    pub fn predict(&self, bytes: &[u8]) -> Result<Vec<Prediction>> {
        let probabilities = self.probabilities(bytes)?;
        Ok(rank(&probabilities, &self.labels, self.top_k))
    }

    /// Quiz round: predict, then check the expected word against the
    /// top-K set.
    pub fn quiz(&self, bytes: &[u8], expected: &str) -> Result<QuizVerdict> {
        let predictions = self.predict(bytes)?;
        verdict(&predictions, expected)
    }
}

/// Select the top `k` classes from a probability distribution, resolving
/// names through the label table. Descending probability order; ties keep
/// their original index order (stable sort).
pub(crate) fn rank(probabilities: &[f32], labels: &LabelTable, k: usize) -> Vec<Prediction> {
    let mut indexed: Vec<(usize, f32)> = probabilities.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    indexed
        .into_iter()
        .take(k)
        .map(|(index, probability)| Prediction {
            label: labels.get(index).unwrap_or("unknown").to_string(),
            probability: round_probability(probability),
        })
        .collect()
}

/// Quiz verdict over an ordered prediction list: first match wins; a miss
/// surfaces the top-1 prediction so the caller always gets a best effort
/// answer next to the flag.
pub(crate) fn verdict(predictions: &[Prediction], expected: &str) -> Result<QuizVerdict> {
    let wanted = expected.trim();
    let wanted_lower = wanted.to_lowercase();

    if predictions
        .iter()
        .any(|p| p.label.to_lowercase() == wanted_lower)
    {
        return Ok(QuizVerdict {
            result: wanted.to_string(),
            correct: true,
        });
    }

    let best = predictions
        .first()
        .ok_or_else(|| Error::Inference("empty prediction set".to_string()))?;

    Ok(QuizVerdict {
        result: best.label.clone(),
        correct: false,
    })
}
