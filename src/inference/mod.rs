//! Model loading and inference.

mod engine;
mod loader;
mod regressor;

pub use engine::{InferenceEngine, Prediction};
pub use loader::ModelLoader;
pub use regressor::{OnnxRegressor, Regressor};
