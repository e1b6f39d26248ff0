// GestureWatch - Decision Forest Classifier
//
// Evaluates a tree ensemble exported by the training scripts. Features are
// raw sensor counts as `i16`; each tree votes for one class and the majority
// wins. Vote fractions double as per-class probabilities.

use super::{Classification, ClassifierKind, GestureClassifier};
use crate::error::GestureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// Go `left` when `features[feature] < threshold`, else `right`.
    Split {
        feature: u16,
        threshold: i16,
        left: u16,
        right: u16,
    },
    Leaf {
        class: u8,
    },
}

/// Trees are node tables rooted at index 0.
#[derive(Debug, Clone, Copy)]
pub struct DecisionForest<'m> {
    trees: &'m [&'m [Node]],
    class_count: usize,
    feature_count: usize,
}

impl<'m> DecisionForest<'m> {
    /// Validate the tables once so evaluation can index without checks.
    /// Children must come after their parent, which also rules out cycles.
    pub fn new(
        trees: &'m [&'m [Node]],
        class_count: usize,
        feature_count: usize,
    ) -> Result<Self, GestureError> {
        if trees.is_empty() {
            return Err(GestureError::Model("forest has no trees"));
        }

        for tree in trees {
            if tree.is_empty() {
                return Err(GestureError::Model("empty tree"));
            }
            for (i, node) in tree.iter().enumerate() {
                match *node {
                    Node::Split {
                        feature,
                        left,
                        right,
                        ..
                    } => {
                        if feature as usize >= feature_count {
                            return Err(GestureError::Model("split on missing feature"));
                        }
                        let (l, r) = (left as usize, right as usize);
                        if l <= i || r <= i || l >= tree.len() || r >= tree.len() {
                            return Err(GestureError::Model("child index out of order"));
                        }
                    }
                    Node::Leaf { class } => {
                        if class as usize >= class_count {
                            return Err(GestureError::Model("leaf class out of range"));
                        }
                    }
                }
            }
        }

        Ok(Self {
            trees,
            class_count,
            feature_count,
        })
    }

    pub fn class_count(&self) -> usize {
        self.class_count
    }

    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    fn eval_tree(tree: &[Node], features: &[i16]) -> usize {
        let mut i = 0;
        loop {
            match tree[i] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    i = if features[feature as usize] < threshold {
                        left as usize
                    } else {
                        right as usize
                    };
                }
                Node::Leaf { class } => return class as usize,
            }
        }
    }

    fn check_len(&self, features: &[i16]) -> Result<(), GestureError> {
        if features.len() != self.feature_count {
            return Err(GestureError::FeatureLength {
                expected: self.feature_count,
                actual: features.len(),
            });
        }
        Ok(())
    }

    /// Votes per class, indexed by 0-based class.
    pub fn votes(&self, features: &[i16]) -> Result<Vec<u32>, GestureError> {
        self.check_len(features)?;
        let mut votes = vec![0u32; self.class_count];
        for tree in self.trees {
            votes[Self::eval_tree(tree, features)] += 1;
        }
        Ok(votes)
    }

    /// 0-based majority class. Ties go to the lower class index.
    pub fn predict(&self, features: &[i16]) -> Result<usize, GestureError> {
        let votes = self.votes(features)?;
        let mut best = 0;
        for (class, &n) in votes.iter().enumerate() {
            if n > votes[best] {
                best = class;
            }
        }
        Ok(best)
    }

    /// Fraction of trees voting for each class.
    pub fn predict_proba(&self, features: &[i16]) -> Result<Vec<f32>, GestureError> {
        let n = self.trees.len() as f32;
        Ok(self
            .votes(features)?
            .into_iter()
            .map(|v| v as f32 / n)
            .collect())
    }
}

/// `GestureClassifier` adapter: converts the float window to `i16` counts
/// (saturating) and reports vote fractions as scores.
pub struct ForestClassifier<'m> {
    forest: DecisionForest<'m>,
    counts: Vec<i16>,
}

impl<'m> ForestClassifier<'m> {
    pub fn new(forest: DecisionForest<'m>) -> Self {
        Self {
            counts: Vec::with_capacity(forest.feature_count()),
            forest,
        }
    }
}

impl GestureClassifier for ForestClassifier<'_> {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::VoteForest
    }

    fn class_count(&self) -> usize {
        self.forest.class_count()
    }

    fn classify(&mut self, features: &[f32]) -> Result<Classification, GestureError> {
        self.counts.clear();
        self.counts.extend(features.iter().map(|&v| v.round() as i16));

        let scores = self.forest.predict_proba(&self.counts)?;
        let winner = self.forest.predict(&self.counts)?;
        Ok(Classification::from_index(Some(winner), scores))
    }
}
