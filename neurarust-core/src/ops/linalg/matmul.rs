use crate::autograd::BackwardOp;
use crate::error::NeuraRustError;
use crate::ops::linalg::transpose_op;
use crate::ops::{link_backward, needs_grad};
use crate::tensor::Tensor;

/// Backward context for `C = A @ B`.
#[derive(Debug)]
struct MatmulBackward {
    a: Tensor,
    b: Tensor,
}

impl BackwardOp for MatmulBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuraRustError> {
        // dA = dC @ B^T, dB = A^T @ dC
        let grad_a = matmul_op(grad_output, &transpose_op(&self.b)?)?;
        let grad_b = matmul_op(&transpose_op(&self.a)?, grad_output)?;
        Ok(vec![grad_a, grad_b])
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone(), self.b.clone()]
    }
}

/// Performs matrix multiplication C = A @ B.
/// Supports 2-D tensors only: A: [M, K], B: [K, N] -> C: [M, N].
pub fn matmul_op(a: &Tensor, b: &Tensor) -> Result<Tensor, NeuraRustError> {
    let a_guard = a.read_data();
    let b_guard = b.read_data();

    if a_guard.shape.len() != 2 || b_guard.shape.len() != 2 || a_guard.shape[1] != b_guard.shape[0] {
        return Err(NeuraRustError::IncompatibleShapes {
            shape1: a_guard.shape.clone(),
            shape2: b_guard.shape.clone(),
            operation: "matmul".to_string(),
        });
    }

    let (m, k, n) = (a_guard.shape[0], a_guard.shape[1], b_guard.shape[1]);
    let a_data = &a_guard.buffer;
    let b_data = &b_guard.buffer;
    let mut output = vec![0.0f32; m * n];
    for i in 0..m {
        let out_row = &mut output[i * n..(i + 1) * n];
        for l in 0..k {
            let a_il = a_data[i * k + l];
            if a_il == 0.0 {
                continue;
            }
            let b_row = &b_data[l * n..(l + 1) * n];
            for (out, &b_lj) in out_row.iter_mut().zip(b_row.iter()) {
                *out += a_il * b_lj;
            }
        }
    }
    drop(a_guard);
    drop(b_guard);

    let result = Tensor::new(output, vec![m, n])?;
    if needs_grad(&[a, b]) {
        link_backward(
            &result,
            MatmulBackward {
                a: a.clone(),
                b: b.clone(),
            },
        );
    }
    Ok(result)
}

#[cfg(test)]
#[path = "matmul_test.rs"]
mod tests;
