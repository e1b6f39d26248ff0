// GestureWatch - Classification Pipeline
//
// raw capture -> FixedWindow (resample) -> [StandardScaler] -> classifier

use crate::classifier::{Classification, GestureClassifier};
use crate::config::PipelineConfig;
use crate::error::GestureError;
use crate::resample::FixedWindow;
use crate::scaler::StandardScaler;
use crate::sensor::Sample;

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub classification: Classification,
    /// Samples actually captured.
    pub captured: usize,
    /// The capture was far shorter than the model window and had to be
    /// stretched; treat the result with less confidence.
    pub stretched: bool,
}

pub struct GesturePipeline<'t, C> {
    config: PipelineConfig,
    scaler: Option<StandardScaler<'t>>,
    classifier: C,
}

impl<'t, C: GestureClassifier> GesturePipeline<'t, C> {
    pub fn new(config: PipelineConfig, classifier: C) -> Self {
        Self {
            config,
            scaler: None,
            classifier,
        }
    }

    /// Standardize features before classification. The classifier then sees
    /// exactly `scaler.feature_count()` features.
    pub fn with_scaler(mut self, scaler: StandardScaler<'t>) -> Self {
        self.scaler = Some(scaler);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Build the fixed-length feature vector for a capture.
    pub fn features<const A: usize>(&self, raw: &[Sample<A>]) -> Vec<f32> {
        let window = FixedWindow::from_capture(raw, self.config.window_len, self.config.oversize);
        let flat = window.flatten();
        match &self.scaler {
            Some(scaler) => scaler.transform(&flat, scaler.feature_count()),
            None => flat,
        }
    }

    pub fn run<const A: usize>(&mut self, raw: &[Sample<A>]) -> Result<Outcome, GestureError> {
        let features = self.features(raw);
        let classification = self.classifier.classify(&features)?;

        let stretched = raw.len() < self.config.min_confident_samples;
        if stretched {
            log::warn!(
                "short capture: {} samples stretched to {}",
                raw.len(),
                self.config.window_len
            );
        }

        Ok(Outcome {
            classification,
            captured: raw.len(),
            stretched,
        })
    }
}
