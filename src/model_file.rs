// GestureWatch - Model Files (host)
//
// JSON export of the forest and MLP tables, so the replay tool can run the
// same classifiers the firmware embeds as const tables.
//
//   {"kind": "forest", "class_count": 6, "feature_count": 600,
//    "trees": [[{"feature": 0, "threshold": 12, "left": 1, "right": 2},
//               {"class": 0}, {"class": 3}]]}
//
//   {"kind": "mlp", "layers": [{"inputs": 600, "outputs": 32, "weights": [..],
//    "biases": [..], "activation": "relu"}, ..],
//    "scaler": {"mean": [..], "scale": [..]}}

use serde::Deserialize;

use crate::classifier::{Activation, DecisionForest, DenseLayer, Mlp, Node};
use crate::error::GestureError;
use crate::scaler::StandardScaler;

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelFile {
    Forest(ForestFile),
    Mlp(MlpFile),
}

impl ModelFile {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NodeEntry {
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

impl From<&NodeEntry> for Node {
    fn from(entry: &NodeEntry) -> Self {
        match *entry {
            NodeEntry::Split {
                feature,
                threshold,
                left,
                right,
            } => Node::Split {
                feature,
                threshold,
                left,
                right,
            },
            NodeEntry::Leaf { class } => Node::Leaf { class },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ForestFile {
    pub class_count: usize,
    pub feature_count: usize,
    trees: Vec<Vec<NodeEntry>>,
}

impl ForestFile {
    /// Node tables, one per tree. Borrow them into a `DecisionForest` with
    /// [`ForestFile::forest`].
    pub fn node_tables(&self) -> Vec<Vec<Node>> {
        self.trees
            .iter()
            .map(|tree| tree.iter().map(Node::from).collect())
            .collect()
    }

    pub fn forest<'m>(&self, trees: &'m [&'m [Node]]) -> Result<DecisionForest<'m>, GestureError> {
        DecisionForest::new(trees, self.class_count, self.feature_count)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ActivationName {
    Identity,
    Relu,
    Softmax,
}

impl From<ActivationName> for Activation {
    fn from(name: ActivationName) -> Self {
        match name {
            ActivationName::Identity => Activation::Identity,
            ActivationName::Relu => Activation::Relu,
            ActivationName::Softmax => Activation::Softmax,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LayerEntry {
    inputs: usize,
    outputs: usize,
    weights: Vec<f32>,
    biases: Vec<f32>,
    activation: ActivationName,
}

#[derive(Debug, Deserialize)]
struct ScalerEntry {
    mean: Vec<f32>,
    scale: Vec<f32>,
}

#[derive(Debug, Deserialize)]
pub struct MlpFile {
    layers: Vec<LayerEntry>,
    #[serde(default)]
    scaler: Option<ScalerEntry>,
}

impl MlpFile {
    pub fn mlp(&self) -> Result<Mlp<'_>, GestureError> {
        Mlp::new(
            self.layers
                .iter()
                .map(|l| DenseLayer {
                    inputs: l.inputs,
                    outputs: l.outputs,
                    weights: &l.weights,
                    biases: &l.biases,
                    activation: l.activation.into(),
                })
                .collect(),
        )
    }

    /// Standardization stage exported with the network, if any.
    pub fn scaler(&self) -> Result<Option<StandardScaler<'_>>, GestureError> {
        self.scaler
            .as_ref()
            .map(|s| StandardScaler::new(&s.mean, &s.scale))
            .transpose()
    }
}
