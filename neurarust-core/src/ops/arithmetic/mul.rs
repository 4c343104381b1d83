use crate::autograd::BackwardOp;
use crate::error::NeuraRustError;
use crate::ops::arithmetic::broadcast_binary;
use crate::ops::{link_backward, needs_grad};
use crate::tensor::Tensor;

/// Backward operation context for multiplication.
#[derive(Debug)]
struct MulBackward {
    a: Tensor,
    b: Tensor,
    a_shape: Vec<usize>,
    b_shape: Vec<usize>,
}

impl BackwardOp for MulBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuraRustError> {
        // grad_a = grad_output * b
        let grad_a = mul_op(grad_output, &self.b)?.reduce_to_shape(&self.a_shape)?;
        // grad_b = grad_output * a
        let grad_b = mul_op(grad_output, &self.a)?.reduce_to_shape(&self.b_shape)?;
        Ok(vec![grad_a, grad_b])
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone(), self.b.clone()]
    }
}

/// Element-wise `a * b` with broadcasting.
pub fn mul_op(a: &Tensor, b: &Tensor) -> Result<Tensor, NeuraRustError> {
    let output = broadcast_binary(a, b, |x, y| x * y)?;
    if needs_grad(&[a, b]) {
        link_backward(
            &output,
            MulBackward {
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
#[path = "mul_test.rs"]
mod tests;
