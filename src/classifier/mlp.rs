// GestureWatch - MLP Classifier
//
// Dense feed-forward network exported from training. Expects standardized
// inputs, so it normally sits behind the `StandardScaler` stage.

use super::{argmax, Classification, ClassifierKind, GestureClassifier};
use crate::error::GestureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Identity,
    Relu,
    Softmax,
}

/// `weights` is row-major `[outputs][inputs]`.
#[derive(Debug, Clone, Copy)]
pub struct DenseLayer<'m> {
    pub inputs: usize,
    pub outputs: usize,
    pub weights: &'m [f32],
    pub biases: &'m [f32],
    pub activation: Activation,
}

impl DenseLayer<'_> {
    fn forward(&self, input: &[f32], out: &mut Vec<f32>) {
        out.clear();
        out.extend(
            self.weights
                .chunks_exact(self.inputs)
                .zip(self.biases)
                .map(|(row, bias)| bias + row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>()),
        );

        match self.activation {
            Activation::Identity => {}
            Activation::Relu => out.iter_mut().for_each(|v| *v = v.max(0.0)),
            Activation::Softmax => softmax(out),
        }
    }
}

fn softmax(values: &mut [f32]) {
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut sum = 0.0;
    for v in values.iter_mut() {
        *v = (*v - max).exp();
        sum += *v;
    }
    if sum > 0.0 {
        values.iter_mut().for_each(|v| *v /= sum);
    }
}

#[derive(Debug, Clone)]
pub struct Mlp<'m> {
    layers: Vec<DenseLayer<'m>>,
}

impl<'m> Mlp<'m> {
    pub fn new(layers: Vec<DenseLayer<'m>>) -> Result<Self, GestureError> {
        if layers.is_empty() {
            return Err(GestureError::Model("network has no layers"));
        }
        for layer in &layers {
            if layer.inputs == 0 || layer.weights.len() != layer.inputs * layer.outputs {
                return Err(GestureError::Model("weight table does not match layer shape"));
            }
            if layer.biases.len() != layer.outputs {
                return Err(GestureError::Model("bias table does not match layer shape"));
            }
        }
        if layers.windows(2).any(|pair| pair[0].outputs != pair[1].inputs) {
            return Err(GestureError::Model("consecutive layers disagree on width"));
        }
        Ok(Self { layers })
    }

    pub fn input_len(&self) -> usize {
        self.layers[0].inputs
    }

    pub fn output_len(&self) -> usize {
        self.layers[self.layers.len() - 1].outputs
    }

    /// Run the network; returns the last layer's activations.
    pub fn forward(&self, input: &[f32]) -> Result<Vec<f32>, GestureError> {
        if input.len() != self.input_len() {
            return Err(GestureError::FeatureLength {
                expected: self.input_len(),
                actual: input.len(),
            });
        }

        let mut current = input.to_vec();
        let mut next = Vec::new();
        for layer in &self.layers {
            layer.forward(&current, &mut next);
            std::mem::swap(&mut current, &mut next);
        }
        Ok(current)
    }
}

pub struct MlpClassifier<'m> {
    mlp: Mlp<'m>,
}

impl<'m> MlpClassifier<'m> {
    pub fn new(mlp: Mlp<'m>) -> Self {
        Self { mlp }
    }
}

impl GestureClassifier for MlpClassifier<'_> {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::ScoreVector
    }

    fn class_count(&self) -> usize {
        self.mlp.output_len()
    }

    fn classify(&mut self, features: &[f32]) -> Result<Classification, GestureError> {
        let scores = self.mlp.forward(features)?;
        Ok(Classification::from_index(argmax(&scores), scores))
    }
}
