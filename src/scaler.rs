// GestureWatch - Feature Standardization
//
// Reproduces the training-time StandardScaler: out = (x - mean) / scale.
// The mean/scale tables are exported next to the model and must match it
// exactly, otherwise accuracy drops without any runtime error.

use crate::error::GestureError;

#[derive(Debug, Clone, Copy)]
pub struct StandardScaler<'t> {
    mean: &'t [f32],
    scale: &'t [f32],
}

impl<'t> StandardScaler<'t> {
    pub fn new(mean: &'t [f32], scale: &'t [f32]) -> Result<Self, GestureError> {
        if mean.len() != scale.len() {
            return Err(GestureError::ScalerTables {
                mean: mean.len(),
                scale: scale.len(),
            });
        }
        Ok(Self { mean, scale })
    }

    /// Number of features the tables were fitted on.
    pub fn feature_count(&self) -> usize {
        self.mean.len()
    }

    /// Standardize `input` into `out`.
    ///
    /// Only the first `min(F, input.len(), out.len())` entries are computed;
    /// the rest of `out` is zeroed. A zero scale leaves the feature centred
    /// but unscaled.
    pub fn transform_into(&self, input: &[f32], out: &mut [f32]) {
        let n = self.feature_count().min(input.len()).min(out.len());
        if n < self.feature_count() || input.len() != self.feature_count() {
            log::debug!(
                "scaler: {} features in, {} fitted, {} out; using {}",
                input.len(),
                self.feature_count(),
                out.len(),
                n
            );
        }

        for i in 0..n {
            let centred = input[i] - self.mean[i];
            out[i] = if self.scale[i] != 0.0 {
                centred / self.scale[i]
            } else {
                centred
            };
        }
        out[n..].fill(0.0);
    }

    /// Standardize into a fresh vector of `out_len` features.
    pub fn transform(&self, input: &[f32], out_len: usize) -> Vec<f32> {
        let mut out = vec![0.0; out_len];
        self.transform_into(input, &mut out);
        out
    }
}
