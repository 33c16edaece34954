//! Schema inference from sampled values.

mod inferencer;

pub use inferencer::{InferenceConfig, SchemaInferencer};
