// GestureWatch - Classifier Interface
//
// Every backend takes the flattened (and possibly standardized) feature
// vector and returns a `Classification`. Class ids follow one convention for
// all backends:
//
//   class_id 0        -> unknown / no confident match
//   class_id 1..=K    -> CLASS_LABELS[class_id - 1], score at scores[class_id - 1]

pub mod forest;
pub mod mlp;
pub mod score;

use crate::error::GestureError;

pub use forest::{DecisionForest, ForestClassifier, Node};
pub use mlp::{Activation, DenseLayer, Mlp, MlpClassifier};
pub use score::ScoreClassifier;

/// How a backend arrives at its scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierKind {
    /// Opaque model returning one probability per class.
    ScoreVector,
    /// Tree ensemble; scores are vote fractions.
    VoteForest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub class_id: u16,
    /// One entry per class, index `class_id - 1`. Not necessarily summing to 1.
    pub scores: Vec<f32>,
}

impl Classification {
    pub const UNKNOWN: u16 = 0;

    /// Build from a 0-based winning index as produced by argmax/vote loops.
    pub fn from_index(index: Option<usize>, scores: Vec<f32>) -> Self {
        let class_id = index.map_or(Self::UNKNOWN, |i| (i + 1) as u16);
        Self { class_id, scores }
    }

    pub fn is_unknown(&self) -> bool {
        self.class_id == Self::UNKNOWN
    }

    /// Score of the winning class, `None` when unknown.
    pub fn confidence(&self) -> Option<f32> {
        let idx = (self.class_id as usize).checked_sub(1)?;
        self.scores.get(idx).copied()
    }

    pub fn label<'l>(&self, labels: &[&'l str]) -> &'l str {
        (self.class_id as usize)
            .checked_sub(1)
            .and_then(|i| labels.get(i).copied())
            .unwrap_or("unknown")
    }

    /// Score indices, highest score first. Ties keep class order.
    pub fn ranked(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.scores.len()).collect();
        order.sort_by(|&a, &b| {
            self.scores[b]
                .partial_cmp(&self.scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        order
    }
}

pub trait GestureClassifier {
    fn kind(&self) -> ClassifierKind;

    /// Number of classes the scores cover.
    fn class_count(&self) -> usize;

    fn classify(&mut self, features: &[f32]) -> Result<Classification, GestureError>;
}

impl<C: GestureClassifier + ?Sized> GestureClassifier for Box<C> {
    fn kind(&self) -> ClassifierKind {
        (**self).kind()
    }

    fn class_count(&self) -> usize {
        (**self).class_count()
    }

    fn classify(&mut self, features: &[f32]) -> Result<Classification, GestureError> {
        (**self).classify(features)
    }
}

/// Index of the largest value; the first one wins ties. `None` if empty.
pub(crate) fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
