// GestureWatch - Window Resampler
//
// Stretches or squeezes a captured gesture to the fixed row count the model
// expects, interpolating each axis linearly between neighbouring samples.

use crate::sensor::Sample;

/// What to do with captures longer than the model window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OversizePolicy {
    /// Downsample the whole capture into the window.
    Resample,
    /// Keep only the first `window_len` samples.
    Truncate,
}

/// Exactly `len()` rows of `A` axes, ready for the feature stage.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedWindow<const A: usize> {
    rows: Vec<Sample<A>>,
}

impl<const A: usize> FixedWindow<A> {
    /// Build a window from a raw capture. An empty capture yields a
    /// zero-filled window.
    pub fn from_capture(raw: &[Sample<A>], window_len: usize, policy: OversizePolicy) -> Self {
        let source = match policy {
            OversizePolicy::Truncate if raw.len() > window_len => &raw[..window_len],
            _ => raw,
        };

        let mut rows = vec![[0.0; A]; window_len];
        resample(source, &mut rows);
        Self { rows }
    }

    pub fn rows(&self) -> &[Sample<A>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row-major flattening: `[r0.a0, r0.a1, .., r1.a0, ..]`, length `A * len()`.
    pub fn flatten(&self) -> Vec<f32> {
        self.rows.iter().flat_map(|row| row.iter().copied()).collect()
    }
}

/// Linearly resample `source` into `dest`, filling every row of `dest`.
///
/// Output row `i` sits at source position `i * (src - 1) / (dest - 1)`; a
/// one-row destination takes position 0. The upper neighbour is clamped to
/// the last source row, so the tail is never extrapolated. Empty `source` or
/// `dest` leaves `dest` untouched.
pub fn resample<const A: usize>(source: &[Sample<A>], dest: &mut [Sample<A>]) {
    let src_len = source.len();
    let dest_len = dest.len();
    if src_len == 0 || dest_len == 0 {
        return;
    }

    let last = src_len - 1;
    for (i, out) in dest.iter_mut().enumerate() {
        let pos = if dest_len == 1 {
            0.0
        } else {
            (i as f32) * (last as f32) / ((dest_len - 1) as f32)
        };
        let idx = (pos as usize).min(last);
        let frac = pos - idx as f32;

        let lo = &source[idx];
        let hi = if idx + 1 < src_len { &source[idx + 1] } else { lo };
        for axis in 0..A {
            out[axis] = lo[axis] + frac * (hi[axis] - lo[axis]);
        }
    }
}
