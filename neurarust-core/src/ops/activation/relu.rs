use crate::autograd::BackwardOp;
use crate::error::NeuraRustError;
use crate::ops::arithmetic::broadcast_binary;
use crate::ops::{link_backward, map_unary, needs_grad};
use crate::tensor::Tensor;

#[derive(Debug)]
struct ReluBackward {
    input: Tensor,
}

impl BackwardOp for ReluBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuraRustError> {
        // grad = upstream_grad * (input > 0)
        let grad = broadcast_binary(grad_output, &self.input, |g, x| if x > 0.0 { g } else { 0.0 })?;
        Ok(vec![grad])
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.input.clone()]
    }
}

/// Applies the Rectified Linear Unit element-wise: `ReLU(x) = max(0, x)`.
pub fn relu_op(input: &Tensor) -> Result<Tensor, NeuraRustError> {
    let output = map_unary(input, |x| if x > 0.0 { x } else { 0.0 })?;
    if needs_grad(&[input]) {
        link_backward(&output, ReluBackward { input: input.clone() });
    }
    Ok(output)
}

#[cfg(test)]
#[path = "relu_test.rs"]
mod tests;
