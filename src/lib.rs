// GestureWatch - Button-triggered IMU gesture classifier
//
// Hold the button, draw a gesture, release: the capture is resampled to the
// model window, optionally standardized, classified, and the result is
// written to the report UART as one text line.
//
// The pipeline core is target independent and tested on the host. Hardware
// glue (`drivers`, `tasks`) only builds for ESP-IDF.

pub mod capture_log;
pub mod classifier;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod pipeline;
pub mod recorder;
pub mod report;
pub mod resample;
pub mod scaler;
pub mod sensor;

#[cfg(not(target_os = "espidf"))]
pub mod model_file;

#[cfg(target_os = "espidf")]
pub mod drivers;
#[cfg(target_os = "espidf")]
pub mod tasks;

pub use classifier::{Classification, GestureClassifier};
pub use config::PipelineConfig;
pub use controller::{CaptureMode, GestureController};
pub use error::GestureError;
pub use pipeline::GesturePipeline;
pub use recorder::GestureRecorder;
pub use resample::{resample, FixedWindow, OversizePolicy};
pub use scaler::StandardScaler;
