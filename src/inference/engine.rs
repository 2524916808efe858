//! Inference engine wrapping a loaded regressor.

use crate::constants::MODEL_OUTPUTS;
use crate::error::{Error, Result};
use crate::imaging::{DecodedImage, ImageTransform};
use crate::inference::Regressor;
use image::RgbImage;
use serde::Serialize;

/// Predicted location of an image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
}

impl Prediction {
    /// Interpret a raw model output vector.
    ///
    /// The output must hold exactly two values: longitude first, then latitude.
    pub fn from_outputs(outputs: &[f32]) -> Result<Self> {
        let &[longitude, latitude] = outputs else {
            return Err(Error::OutputShape {
                expected: MODEL_OUTPUTS,
                actual: outputs.len(),
            });
        };

        if !longitude.is_finite() || !latitude.is_finite() {
            return Err(Error::Inference {
                reason: format!("non-finite output ({longitude}, {latitude})"),
            });
        }

        Ok(Self {
            longitude: f64::from(longitude),
            latitude: f64::from(latitude),
        })
    }
}

/// Immutable, shareable inference entry point.
pub struct InferenceEngine {
    model: Box<dyn Regressor>,
    transform: ImageTransform,
}

impl InferenceEngine {
    /// Pair a loaded model with its preprocessing.
    pub fn new(model: Box<dyn Regressor>, transform: ImageTransform) -> Self {
        Self { model, transform }
    }

    /// Preprocessing applied before every forward pass.
    pub const fn transform(&self) -> &ImageTransform {
        &self.transform
    }

    /// Predict the location of a decoded image.
    pub fn predict(&self, image: &DecodedImage) -> Result<Prediction> {
        let input = self.transform.apply(image);
        let outputs = self.model.forward(input)?;
        Prediction::from_outputs(&outputs)
    }

    /// Run one prediction on a blank image to prove the model accepts the
    /// transform's input shape and produces a usable output.
    pub fn warm_up(&self) -> Result<Prediction> {
        let side = self.transform.size();
        self.predict(&DecodedImage::from(RgbImage::new(side, side)))
    }
}

impl std::fmt::Debug for InferenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceEngine")
            .field("transform", &self.transform)
            .finish_non_exhaustive()
    }
}
