//! Configuration structures for the sketch classification service.
//!
//! Every deployed endpoint variant is described by a single
//! [`VariantConfig`]: weights path, input tensor contract, normalization
//! constants, top-K depth, and whether the endpoint answers quiz rounds.
//! The service ships two presets and can load custom variants from JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::ImageDimensions;

/// Per-channel normalization constants applied after scaling pixels to [0, 1]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Normalization {
    /// Per-channel means, length must equal the channel count
    pub mean: Vec<f32>,
    /// Per-channel standard deviations, length must equal the channel count
    pub std: Vec<f32>,
}

impl Normalization {
    /// Single-channel normalization mapping [0, 1] to [-1, 1]
    pub fn grayscale() -> Self {
        Self {
            mean: vec![0.5],
            std: vec![0.5],
        }
    }

    /// ImageNet RGB normalization values
    pub fn imagenet() -> Self {
        Self {
            mean: vec![0.485, 0.456, 0.406],
            std: vec![0.229, 0.224, 0.225],
        }
    }
}

/// Configuration for one endpoint variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantConfig {
    /// Variant name, used in logs
    pub name: String,
    /// Path to the compact weights record read once at startup
    pub weights_path: PathBuf,
    /// Fixed input tensor dimensions the model expects
    pub input: ImageDimensions,
    /// Normalization constants tied to how the model was trained
    pub normalization: Normalization,
    /// Number of predictions returned per request
    pub top_k: usize,
    /// Whether the endpoint compares predictions against a quiz word
    pub quiz_mode: bool,
}

impl VariantConfig {
    /// Classification preset: 30-class grayscale sketch model, top-10
    pub fn sketch() -> Self {
        Self {
            name: "sketch".to_string(),
            weights_path: PathBuf::from("models/sketch_classifier.mpk"),
            input: ImageDimensions::new(64, 64, 1),
            normalization: Normalization::grayscale(),
            top_k: 10,
            quiz_mode: false,
        }
    }

    /// Quiz preset: RGB model served behind the draw-and-guess game, top-5
    pub fn quiz() -> Self {
        Self {
            name: "quiz".to_string(),
            weights_path: PathBuf::from("models/quiz_classifier.mpk"),
            input: ImageDimensions::new(112, 112, 3),
            normalization: Normalization::imagenet(),
            top_k: 5,
            quiz_mode: true,
        }
    }

    /// Resolve a preset by name
    pub fn preset(name: &str) -> Result<Self> {
        match name {
            "sketch" => Ok(Self::sketch()),
            "quiz" => Ok(Self::quiz()),
            other => Err(Error::Config(format!(
                "unknown variant preset '{}' (expected 'sketch' or 'quiz')",
                other
            ))),
        }
    }

    /// Loads a variant configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: VariantConfig = serde_json::from_str(&json)
            .map_err(|e| Error::Config(format!("failed to parse variant config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks internal consistency. Called once at startup; a failure here
    /// means the process must not serve.
    pub fn validate(&self) -> Result<()> {
        let channels = self.input.channels;
        if channels != 1 && channels != 3 {
            return Err(Error::Config(format!(
                "unsupported channel count {} (expected 1 or 3)",
                channels
            )));
        }
        if self.input.width == 0 || self.input.height == 0 {
            return Err(Error::Config("input dimensions must be non-zero".to_string()));
        }
        if self.input.width != self.input.height {
            return Err(Error::Config(format!(
                "input must be square, got {}x{}",
                self.input.width, self.input.height
            )));
        }
        // Three 2x poolings feed a fixed-size linear layer
        if self.input.width % 8 != 0 {
            return Err(Error::Config(format!(
                "input size {} must be a multiple of 8",
                self.input.width
            )));
        }
        if self.normalization.mean.len() != channels as usize
            || self.normalization.std.len() != channels as usize
        {
            return Err(Error::Config(format!(
                "normalization constants must have {} entries per channel",
                channels
            )));
        }
        if self.normalization.std.iter().any(|&s| s <= 0.0) {
            return Err(Error::Config(
                "normalization std values must be positive".to_string(),
            ));
        }
        if self.top_k == 0 {
            return Err(Error::Config("top_k must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sketch_preset() {
        let config = VariantConfig::sketch();
        assert_eq!(config.input.channels, 1);
        assert_eq!(config.input.width, 64);
        assert_eq!(config.top_k, 10);
        assert!(!config.quiz_mode);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_quiz_preset() {
        let config = VariantConfig::quiz();
        assert_eq!(config.input.channels, 3);
        assert_eq!(config.top_k, 5);
        assert!(config.quiz_mode);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_preset_lookup() {
        assert!(VariantConfig::preset("sketch").is_ok());
        assert!(VariantConfig::preset("quiz").is_ok());
        assert!(VariantConfig::preset("mnist").is_err());
    }

    #[test]
    fn test_validate_channel_count() {
        let mut config = VariantConfig::sketch();
        config.input.channels = 4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_normalization_length() {
        let mut config = VariantConfig::quiz();
        config.normalization.mean = vec![0.5];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_input_size() {
        let mut config = VariantConfig::sketch();
        config.input.width = 65;
        config.input.height = 65;
        assert!(config.validate().is_err());

        config.input.width = 100;
        config.input.height = 50;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_top_k() {
        let mut config = VariantConfig::sketch();
        config.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_round_trip() {
        let config = VariantConfig::quiz();
        let json = serde_json::to_string_pretty(&config).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", json).unwrap();

        let loaded = VariantConfig::from_file(file.path()).unwrap();
        assert_eq!(loaded.name, "quiz");
        assert_eq!(loaded.input.width, 112);
        assert_eq!(loaded.top_k, 5);
    }
}
