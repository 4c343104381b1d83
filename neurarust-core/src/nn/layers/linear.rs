use crate::error::NeuraRustError;
use crate::nn::init::kaiming_uniform;
use crate::nn::module::Module;
use crate::nn::parameter::Parameter;
use crate::ops::arithmetic::add_op;
use crate::ops::linalg::{matmul_op, transpose_op};
use crate::tensor::Tensor;
use rand::Rng;

/// Applies a linear transformation to the incoming data: `y = x W^T + b`.
///
/// `weight` has shape `[out_features, in_features]`, `bias` has shape `[out_features]`.
#[derive(Debug, Clone)]
pub struct Linear {
    weight: Parameter,
    bias: Option<Parameter>,
    in_features: usize,
    out_features: usize,
}

impl Linear {
    /// Creates a new Linear layer initialized from the thread-local RNG.
    pub fn new(in_features: usize, out_features: usize, bias: bool) -> Result<Self, NeuraRustError> {
        Self::with_rng(in_features, out_features, bias, &mut rand::thread_rng())
    }

    /// Creates a new Linear layer with weight and bias drawn from
    /// `U(-1/sqrt(in_features), 1/sqrt(in_features))`.
    pub fn with_rng<R: Rng + ?Sized>(
        in_features: usize,
        out_features: usize,
        bias: bool,
        rng: &mut R,
    ) -> Result<Self, NeuraRustError> {
        let weight = kaiming_uniform(&[out_features, in_features], in_features, rng)?;
        let bias = if bias {
            Some(kaiming_uniform(&[out_features], in_features, rng)?)
        } else {
            None
        };
        Self::from_tensors(weight, bias)
    }

    /// Builds a layer around explicit weight and bias values.
    ///
    /// # Errors
    /// `RankMismatch` if `weight` is not 2-D, `ShapeMismatch` if `bias` is not `[out_features]`.
    pub fn from_tensors(weight: Tensor, bias: Option<Tensor>) -> Result<Self, NeuraRustError> {
        let w_shape = weight.shape();
        if w_shape.len() != 2 {
            return Err(NeuraRustError::RankMismatch {
                expected: 2,
                actual: w_shape.len(),
                operation: "Linear::from_tensors".to_string(),
            });
        }
        let (out_features, in_features) = (w_shape[0], w_shape[1]);
        if let Some(b) = &bias {
            if b.shape() != [out_features] {
                return Err(NeuraRustError::ShapeMismatch {
                    expected: vec![out_features],
                    actual: b.shape(),
                    operation: "Linear::from_tensors (bias)".to_string(),
                });
            }
        }
        Ok(Linear {
            weight: Parameter::new(weight, Some("weight".to_string())),
            bias: bias.map(|b| Parameter::new(b, Some("bias".to_string()))),
            in_features,
            out_features,
        })
    }

    pub fn weight(&self) -> &Parameter {
        &self.weight
    }

    pub fn bias(&self) -> Option<&Parameter> {
        self.bias.as_ref()
    }

    pub fn in_features(&self) -> usize {
        self.in_features
    }

    pub fn out_features(&self) -> usize {
        self.out_features
    }
}

impl Module for Linear {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NeuraRustError> {
        let input_shape = input.shape();
        if input_shape.len() != 2 || input_shape[1] != self.in_features {
            return Err(NeuraRustError::ShapeMismatch {
                expected: vec![input_shape.first().copied().unwrap_or(0), self.in_features],
                actual: input_shape,
                operation: "Linear::forward".to_string(),
            });
        }
        let output = matmul_op(input, &transpose_op(&self.weight)?)?;
        match &self.bias {
            Some(b) => add_op(&output, b),
            None => Ok(output),
        }
    }

    fn parameters(&self) -> Vec<&Parameter> {
        let mut params = vec![&self.weight];
        if let Some(b) = &self.bias {
            params.push(b);
        }
        params
    }

    fn named_parameters(&self) -> Vec<(String, &Parameter)> {
        let mut params = vec![("weight".to_string(), &self.weight)];
        if let Some(b) = &self.bias {
            params.push(("bias".to_string(), b));
        }
        params
    }
}

#[cfg(test)]
#[path = "linear_test.rs"]
mod tests;
