//! Image preprocessing: encoded upload bytes to a model input tensor.
//!
//! The transformation is fixed per variant and runs the same steps in
//! the same order for every request: decode, coerce the color mode to
//! the model's channel count, resize directly to the target size
//! (aspect ratio is not preserved), scale to [0, 1], apply per-channel
//! normalization, and add the leading batch dimension.

use burn::tensor::{backend::Backend, Tensor};
use image::{imageops::FilterType, DynamicImage, GrayImage, RgbImage};

use sketch_core::config::{Normalization, VariantConfig};
use sketch_core::error::{Error, Result};
use sketch_core::types::ImageDimensions;

/// Deterministic preprocessor for one endpoint variant
#[derive(Debug, Clone)]
pub struct Preprocessor {
    input: ImageDimensions,
    normalization: Normalization,
}

impl Preprocessor {
    /// Creates a preprocessor from the variant configuration
    pub fn new(variant: &VariantConfig) -> Self {
        Self {
            input: variant.input,
            normalization: variant.normalization.clone(),
        }
    }

    /// The tensor dimensions this preprocessor produces (without batch dim)
    pub fn output_dimensions(&self) -> ImageDimensions {
        self.input
    }

    /// Transforms encoded image bytes into normalized CHW values.
    ///
    /// Undecodable bytes fail with an [`Error::Image`]; this surfaces to
    /// the caller as malformed input, never as a silent default.
    pub fn prepare(&self, bytes: &[u8]) -> Result<Vec<f32>> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| Error::Image(format!("failed to decode image: {}", e)))?;

        let width = self.input.width;
        let height = self.input.height;

        match self.input.channels {
            1 => {
                let gray = DynamicImage::ImageLuma8(decoded.to_luma8())
                    .resize_exact(width, height, FilterType::Triangle)
                    .to_luma8();
                Ok(self.normalize_luma(&gray))
            }
            3 => {
                let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8())
                    .resize_exact(width, height, FilterType::Triangle)
                    .to_rgb8();
                Ok(self.normalize_rgb(&rgb))
            }
            other => Err(Error::Config(format!(
                "unsupported channel count: {}",
                other
            ))),
        }
    }

    /// Builds the batched input tensor [1, C, H, W] on the given device
    pub fn to_tensor<B: Backend>(&self, values: Vec<f32>, device: &B::Device) -> Tensor<B, 4> {
        let ImageDimensions {
            width,
            height,
            channels,
        } = self.input;

        Tensor::<B, 1>::from_floats(values.as_slice(), device).reshape([
            1,
            channels as usize,
            height as usize,
            width as usize,
        ])
    }

    /// Full preprocessing: bytes to a model-ready tensor on `device`
    pub fn prepare_tensor<B: Backend>(
        &self,
        bytes: &[u8],
        device: &B::Device,
    ) -> Result<Tensor<B, 4>> {
        let values = self.prepare(bytes)?;
        Ok(self.to_tensor::<B>(values, device))
    }

    /// Normalize a grayscale image; HW layout is already CHW for one channel
    fn normalize_luma(&self, img: &GrayImage) -> Vec<f32> {
        let mean = self.normalization.mean[0];
        let std = self.normalization.std[0];

        img.pixels()
            .map(|p| (p[0] as f32 / 255.0 - mean) / std)
            .collect()
    }

    /// Normalize an RGB image into CHW layout
    fn normalize_rgb(&self, img: &RgbImage) -> Vec<f32> {
        let num_pixels = (img.width() * img.height()) as usize;
        let mut normalized = vec![0.0f32; 3 * num_pixels];

        for (i, pixel) in img.pixels().enumerate() {
            for c in 0..3 {
                let value = pixel[c] as f32 / 255.0;
                normalized[c * num_pixels + i] =
                    (value - self.normalization.mean[c]) / self.normalization.std[c];
            }
        }

        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;
    use image::{ImageFormat, Rgb, RgbImage};
    use sketch_core::config::VariantConfig;
    use std::io::Cursor;

    type TestBackend = NdArray;

    fn encode_png(img: &RgbImage) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img.clone())
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    fn white_png(width: u32, height: u32) -> Vec<u8> {
        encode_png(&RgbImage::from_pixel(width, height, Rgb([255, 255, 255])))
    }

    #[test]
    fn test_output_shape_for_any_input_size() {
        let preprocessor = Preprocessor::new(&VariantConfig::sketch());

        for (w, h) in [(64, 64), (100, 37), (13, 640), (1, 1)] {
            let values = preprocessor.prepare(&white_png(w, h)).unwrap();
            assert_eq!(values.len(), 64 * 64, "input {}x{}", w, h);
        }
    }

    #[test]
    fn test_rgb_output_shape() {
        let preprocessor = Preprocessor::new(&VariantConfig::quiz());
        let values = preprocessor.prepare(&white_png(300, 200)).unwrap();
        assert_eq!(values.len(), 3 * 112 * 112);
    }

    #[test]
    fn test_grayscale_normalization_values() {
        let preprocessor = Preprocessor::new(&VariantConfig::sketch());

        // White pixels: 255/255 = 1.0 -> (1.0 - 0.5) / 0.5 = 1.0
        let values = preprocessor.prepare(&white_png(64, 64)).unwrap();
        assert!(values.iter().all(|&v| (v - 1.0).abs() < 1e-6));

        // Black pixels map to -1.0
        let black = encode_png(&RgbImage::from_pixel(64, 64, Rgb([0, 0, 0])));
        let values = preprocessor.prepare(&black).unwrap();
        assert!(values.iter().all(|&v| (v + 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_rgb_normalization_finite() {
        let preprocessor = Preprocessor::new(&VariantConfig::quiz());
        let values = preprocessor.prepare(&white_png(112, 112)).unwrap();
        assert!(values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_deterministic() {
        let preprocessor = Preprocessor::new(&VariantConfig::sketch());
        let png = white_png(90, 45);

        let first = preprocessor.prepare(&png).unwrap();
        let second = preprocessor.prepare(&png).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_bytes_rejected() {
        let preprocessor = Preprocessor::new(&VariantConfig::sketch());
        let result = preprocessor.prepare(b"definitely not an image");
        assert!(matches!(result, Err(Error::Image(_))));
    }

    #[test]
    fn test_tensor_shape() {
        let preprocessor = Preprocessor::new(&VariantConfig::sketch());
        let device = Default::default();

        let tensor = preprocessor
            .prepare_tensor::<TestBackend>(&white_png(64, 64), &device)
            .unwrap();
        assert_eq!(tensor.dims(), [1, 1, 64, 64]);
    }

    #[test]
    fn test_rgb_tensor_shape() {
        let preprocessor = Preprocessor::new(&VariantConfig::quiz());
        let device = Default::default();

        let tensor = preprocessor
            .prepare_tensor::<TestBackend>(&white_png(640, 480), &device)
            .unwrap();
        assert_eq!(tensor.dims(), [1, 3, 112, 112]);
    }
}
