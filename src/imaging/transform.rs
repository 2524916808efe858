//! Preprocessing from decoded pixels to the model input tensor.

use crate::config::TransformConfig;
use crate::imaging::DecodedImage;
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbImage};

/// Dense `f32` tensor in NCHW layout, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    shape: [usize; 4],
    data: Vec<f32>,
}

impl ImageTensor {
    /// Tensor shape as `[batch, channels, height, width]`.
    pub const fn shape(&self) -> [usize; 4] {
        self.shape
    }

    /// Flat tensor values.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Split into shape and owned values.
    pub fn into_parts(self) -> ([usize; 4], Vec<f32>) {
        (self.shape, self.data)
    }
}

/// Deterministic grayscale, resize and normalize pipeline.
///
/// Output is always a single-channel `size`x`size` tensor regardless of
/// the input's color or dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTransform {
    size: u32,
    mean: f32,
    std: f32,
}

impl ImageTransform {
    /// Create a transform producing `size`x`size` inputs.
    pub const fn new(size: u32, mean: f32, std: f32) -> Self {
        Self { size, mean, std }
    }

    /// Create a transform from configuration.
    pub const fn from_config(config: &TransformConfig) -> Self {
        Self::new(config.image_size, config.mean, config.std)
    }

    /// Side length of the produced input.
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Shape of every tensor this transform produces.
    pub const fn output_shape(&self) -> [usize; 4] {
        let side = self.size as usize;
        [1, 1, side, side]
    }

    /// Apply the transform.
    pub fn apply(&self, image: &DecodedImage) -> ImageTensor {
        let luma = luminance(image.pixels());
        let resized = imageops::resize(&luma, self.size, self.size, FilterType::Triangle);

        let data = resized
            .as_raw()
            .iter()
            .map(|&v| (f32::from(v) / 255.0 - self.mean) / self.std)
            .collect();

        ImageTensor {
            shape: self.output_shape(),
            data,
        }
    }
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self::from_config(&TransformConfig::default())
    }
}

/// ITU-R 601 luma with rounding, in fixed point.
fn luminance(rgb: &RgbImage) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let weighted = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
        Luma([u8::try_from((weighted + 500) / 1000).unwrap_or(u8::MAX)])
    })
}
