//! Core type definitions for the sketch classification service.

use serde::{Deserialize, Serialize};

/// A single class prediction: label plus its softmax probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Human-readable class name (e.g., "apple")
    #[serde(rename = "class")]
    pub label: String,
    /// Probability in [0, 1], rounded for output stability
    pub probability: f32,
}

/// Outcome of a quiz round: the resolved answer and whether it matched
/// the expected word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizVerdict {
    /// The expected word on a hit, the top-1 prediction on a miss
    pub result: String,
    /// Whether the expected word appeared in the top-K predictions
    pub correct: bool,
}

/// Image dimensions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageDimensions {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of channels (1 for grayscale, 3 for RGB)
    pub channels: u32,
}

impl ImageDimensions {
    /// Creates new image dimensions
    pub fn new(width: u32, height: u32, channels: u32) -> Self {
        Self {
            width,
            height,
            channels,
        }
    }

    /// Total number of tensor elements per image
    pub fn element_count(&self) -> usize {
        (self.width * self.height * self.channels) as usize
    }
}

impl std::fmt::Display for ImageDimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.channels, self.height, self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_serializes_class_field() {
        let prediction = Prediction {
            label: "apple".to_string(),
            probability: 0.9312,
        };
        let json = serde_json::to_value(&prediction).unwrap();
        assert_eq!(json["class"], "apple");
        assert!(json.get("label").is_none());
    }

    #[test]
    fn test_quiz_verdict_serialization() {
        let verdict = QuizVerdict {
            result: "banana".to_string(),
            correct: false,
        };
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["result"], "banana");
        assert_eq!(json["correct"], false);
    }

    #[test]
    fn test_image_dimensions() {
        let dims = ImageDimensions::new(64, 64, 1);
        assert_eq!(dims.element_count(), 64 * 64);
        assert_eq!(dims.to_string(), "1x64x64");

        let rgb = ImageDimensions::new(112, 112, 3);
        assert_eq!(rgb.element_count(), 112 * 112 * 3);
    }
}
