// GestureWatch - Score-Vector Classifier (NanoEdge AI)
//
// Wraps the vendor classifier that returns one probability per class.
//
// Architecture:
//   1. STUB mode (default): an axis-energy heuristic so the capture pipeline
//      can be developed and tested without the vendor library.
//   2. FFI mode: build with `--features nanoedge` and point `NEAI_LIB_DIR` at
//      the exported `libneai.a` (see build.rs).
//
// The vendor library reports its own class id (1-based, 0 = unknown), which
// already matches `Classification`.

use super::{Classification, ClassifierKind, GestureClassifier};
use crate::error::GestureError;

pub struct ScoreClassifier {
    axis_count: usize,
    class_count: usize,
    scores: Vec<f32>,
}

impl ScoreClassifier {
    /// Initialise the backend. Fails when the vendor library rejects its
    /// knowledge buffer; that is fatal for the firmware.
    pub fn new(axis_count: usize, class_count: usize) -> Result<Self, GestureError> {
        backend::init()?;
        log::info!(
            "score classifier ready ({} backend, {} axes, {} classes)",
            backend::NAME,
            axis_count,
            class_count
        );
        Ok(Self {
            axis_count,
            class_count,
            scores: vec![0.0; class_count],
        })
    }
}

impl GestureClassifier for ScoreClassifier {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::ScoreVector
    }

    fn class_count(&self) -> usize {
        self.class_count
    }

    fn classify(&mut self, features: &[f32]) -> Result<Classification, GestureError> {
        let class_id = backend::run(features, self.axis_count, &mut self.scores)?;
        Ok(Classification {
            class_id,
            scores: self.scores.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Stub back-end - development / testing without the vendor library
// ---------------------------------------------------------------------------
#[cfg(not(feature = "nanoedge"))]
mod backend {
    use crate::error::GestureError;

    pub const NAME: &str = "stub";

    /// Below this mean per-axis variance the window counts as "no gesture".
    const STILL_VARIANCE: f32 = 1.0;

    pub fn init() -> Result<(), GestureError> {
        Ok(())
    }

    /// The axis that moved the most picks the class; everything else shares
    /// the remaining probability mass.
    pub fn run(features: &[f32], axis_count: usize, out: &mut [f32]) -> Result<u16, GestureError> {
        if axis_count == 0 || out.is_empty() {
            return Err(GestureError::Model("stub needs at least one axis and one class"));
        }

        let rows = features.len() / axis_count;
        let mut variance = vec![0.0f32; axis_count];
        if rows > 0 {
            for (axis, var) in variance.iter_mut().enumerate() {
                let column = features.iter().skip(axis).step_by(axis_count).take(rows);
                let mean = column.clone().sum::<f32>() / rows as f32;
                *var = column.map(|v| (v - mean) * (v - mean)).sum::<f32>() / rows as f32;
            }
        }

        let classes = out.len();
        let mean_var = variance.iter().sum::<f32>() / axis_count as f32;
        if mean_var < STILL_VARIANCE {
            out.fill(1.0 / classes as f32);
            log::debug!("STUB inference - still window (var {:.3})", mean_var);
            return Ok(0);
        }

        let busiest = crate::classifier::argmax(&variance).unwrap_or(0);
        let winner = busiest % classes;
        let rest = if classes > 1 { 0.4 / (classes - 1) as f32 } else { 0.0 };
        out.fill(rest);
        out[winner] = if classes > 1 { 0.6 } else { 1.0 };

        log::debug!(
            "STUB inference - busiest axis {} (var {:.1}), preds = {:?}",
            busiest,
            variance[busiest],
            out
        );
        Ok(winner as u16 + 1)
    }
}

// ---------------------------------------------------------------------------
// Real FFI back-end - calls the NanoEdge AI static library
// ---------------------------------------------------------------------------
#[cfg(feature = "nanoedge")]
mod backend {
    use crate::error::GestureError;

    pub const NAME: &str = "nanoedge";

    const NEAI_OK: i32 = 0;

    mod ffi {
        extern "C" {
            /// Model knowledge exported alongside the library.
            pub static knowledge: [f32; 0];

            pub fn neai_classification_init(knowledge_buffer: *const f32) -> i32;

            pub fn neai_classification(
                data_input: *mut f32,
                output_buffer: *mut f32,
                id_class: *mut u16,
            ) -> i32;
        }
    }

    pub fn init() -> Result<(), GestureError> {
        // SAFETY: `knowledge` is an immutable table linked from libneai.
        let status = unsafe { ffi::neai_classification_init(ffi::knowledge.as_ptr()) };
        if status != NEAI_OK {
            log::error!("NanoEdge init error: {}", status);
            return Err(GestureError::Classifier(status));
        }
        Ok(())
    }

    /// `features` must hold DATA_INPUT_USER * AXIS_NUMBER floats as the
    /// library was exported with; `out` must hold CLASS_NUMBER floats.
    pub fn run(features: &[f32], _axis_count: usize, out: &mut [f32]) -> Result<u16, GestureError> {
        // The C API takes a mutable input pointer; hand it a scratch copy.
        let mut input = features.to_vec();
        let mut id_class: u16 = 0;

        // SAFETY: single-threaded use from the capture loop; both buffers are
        // sized for the exported model.
        let status = unsafe {
            ffi::neai_classification(input.as_mut_ptr(), out.as_mut_ptr(), &mut id_class)
        };
        if status != NEAI_OK {
            log::error!("NanoEdge classifier error: {}", status);
            return Err(GestureError::Classifier(status));
        }
        Ok(id_class)
    }
}

#[cfg(all(test, not(feature = "nanoedge")))]
mod tests {
    use super::*;

    #[test]
    fn test_still_window_is_unknown() {
        let mut clf = ScoreClassifier::new(3, 4).unwrap();
        let result = clf.classify(&[1.0; 30]).unwrap();
        assert!(result.is_unknown());
        assert_eq!(result.scores, vec![0.25; 4]);
    }

    #[test]
    fn test_busiest_axis_wins() {
        let mut clf = ScoreClassifier::new(3, 6).unwrap();
        // Only the second axis moves.
        let features: Vec<f32> = (0..20)
            .flat_map(|i| [0.0, if i % 2 == 0 { 50.0 } else { -50.0 }, 0.0])
            .collect();
        let result = clf.classify(&features).unwrap();
        assert_eq!(result.class_id, 2);
        assert_eq!(result.confidence(), Some(0.6));
        assert_eq!(result.scores.len(), 6);
    }

    #[test]
    fn test_kind_is_score_vector() {
        let clf = ScoreClassifier::new(6, 6).unwrap();
        assert_eq!(clf.kind(), ClassifierKind::ScoreVector);
        assert_eq!(clf.class_count(), 6);
    }
}
