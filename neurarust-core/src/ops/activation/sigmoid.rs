use crate::autograd::BackwardOp;
use crate::error::NeuraRustError;
use crate::ops::arithmetic::broadcast_binary;
use crate::ops::{link_backward, map_unary, needs_grad};
use crate::tensor::Tensor;

#[derive(Debug)]
struct SigmoidBackward {
    input: Tensor,
    /// sigma(x), reused by the derivative sigma(x) * (1 - sigma(x)).
    output: Tensor,
}

impl BackwardOp for SigmoidBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuraRustError> {
        let grad = broadcast_binary(grad_output, &self.output, |g, s| g * s * (1.0 - s))?;
        Ok(vec![grad])
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.input.clone()]
    }
}

pub(crate) fn sigmoid(x: f32) -> f32 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Applies the logistic sigmoid element-wise: `1 / (1 + exp(-x))`.
pub fn sigmoid_op(input: &Tensor) -> Result<Tensor, NeuraRustError> {
    let output = map_unary(input, sigmoid)?;
    if needs_grad(&[input]) {
        link_backward(
            &output,
            SigmoidBackward {
                input: input.clone(),
                output: output.detach(),
            },
        );
    }
    Ok(output)
}

#[cfg(test)]
#[path = "sigmoid_test.rs"]
mod tests;
