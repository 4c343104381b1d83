use crate::autograd::BackwardOp;
use crate::error::NeuraRustError;
use crate::ops::arithmetic::broadcast_binary;
use crate::ops::{link_backward, map_unary, needs_grad};
use crate::tensor::Tensor;

#[derive(Debug)]
struct SubBackward {
    a: Tensor,
    b: Tensor,
    a_shape: Vec<usize>,
    b_shape: Vec<usize>,
}

impl BackwardOp for SubBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuraRustError> {
        let grad_a = grad_output.reduce_to_shape(&self.a_shape)?;
        let grad_b = map_unary(&grad_output.reduce_to_shape(&self.b_shape)?, |g| -g)?;
        Ok(vec![grad_a, grad_b])
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone(), self.b.clone()]
    }
}

/// Element-wise `a - b` with broadcasting.
pub fn sub_op(a: &Tensor, b: &Tensor) -> Result<Tensor, NeuraRustError> {
    let output = broadcast_binary(a, b, |x, y| x - y)?;
    if needs_grad(&[a, b]) {
        link_backward(
            &output,
            SubBackward {
                a: a.clone(),
                b: b.clone(),
                a_shape: a.shape(),
                b_shape: b.shape(),
            },
        );
    }
    Ok(output)
}

#[cfg(test)]
#[path = "sub_test.rs"]
mod tests;
