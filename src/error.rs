// GestureWatch - Pipeline Errors
//
// Sensor read failures never reach this type: the recorder absorbs them by
// skipping the tick. Everything here aborts the current gesture only.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GestureError {
    /// The classifier backend returned a non-OK status code.
    #[error("classifier status {0}")]
    Classifier(i32),

    /// A fixed-input model was handed the wrong number of features.
    #[error("model expects {expected} features, got {actual}")]
    FeatureLength { expected: usize, actual: usize },

    /// Mean and scale tables disagree on the feature count.
    #[error("scaler tables differ in length (mean {mean}, scale {scale})")]
    ScalerTables { mean: usize, scale: usize },

    /// A model table references a node, feature or class that does not exist.
    #[error("malformed model: {0}")]
    Model(&'static str),
}
