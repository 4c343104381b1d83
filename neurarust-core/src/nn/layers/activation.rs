use crate::error::NeuraRustError;
use crate::nn::module::Module;
use crate::nn::parameter::Parameter;
use crate::ops::activation::{relu_op, sigmoid_op, softmax_op};
use crate::tensor::Tensor;

/// Applies `max(0, x)` element-wise.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReLU;

impl ReLU {
    pub fn new() -> Self {
        ReLU
    }
}

impl Module for ReLU {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NeuraRustError> {
        relu_op(input)
    }

    fn parameters(&self) -> Vec<&Parameter> {
        Vec::new()
    }

    fn named_parameters(&self) -> Vec<(String, &Parameter)> {
        Vec::new()
    }
}

/// Applies the logistic sigmoid element-wise.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sigmoid;

impl Sigmoid {
    pub fn new() -> Self {
        Sigmoid
    }
}

impl Module for Sigmoid {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NeuraRustError> {
        sigmoid_op(input)
    }

    fn parameters(&self) -> Vec<&Parameter> {
        Vec::new()
    }

    fn named_parameters(&self) -> Vec<(String, &Parameter)> {
        Vec::new()
    }
}

/// Normalizes its input with softmax along `dim`.
#[derive(Debug, Clone, Copy)]
pub struct Softmax {
    dim: usize,
}

impl Softmax {
    pub fn new(dim: usize) -> Self {
        Softmax { dim }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl Module for Softmax {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NeuraRustError> {
        softmax_op(input, self.dim)
    }

    fn parameters(&self) -> Vec<&Parameter> {
        Vec::new()
    }

    fn named_parameters(&self) -> Vec<(String, &Parameter)> {
        Vec::new()
    }
}

#[cfg(test)]
#[path = "activation_test.rs"]
mod tests;
