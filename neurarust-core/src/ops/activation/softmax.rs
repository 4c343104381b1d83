use crate::autograd::BackwardOp;
use crate::error::NeuraRustError;
use crate::ops::{link_backward, needs_grad};
use crate::tensor::Tensor;

/// Splits `shape` around `dim` into `(outer, len, inner)` extents of the row-major layout.
fn split_at_dim(shape: &[usize], dim: usize) -> (usize, usize, usize) {
    let outer = shape[..dim].iter().product();
    let inner = shape[dim + 1..].iter().product();
    (outer, shape[dim], inner)
}

#[derive(Debug)]
struct SoftmaxBackward {
    input: Tensor,
    output: Tensor,
    dim: usize,
}

impl BackwardOp for SoftmaxBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuraRustError> {
        // dx_i = y_i * (g_i - sum_j g_j * y_j) along `dim`
        let y_guard = self.output.read_data();
        let g_guard = grad_output.read_data();
        let shape = y_guard.shape.clone();
        let (outer, len, inner) = split_at_dim(&shape, self.dim);
        let y = &y_guard.buffer;
        let g = &g_guard.buffer;

        let mut grad = vec![0.0f32; y.len()];
        for o in 0..outer {
            for i in 0..inner {
                let base = o * len * inner + i;
                let dot: f32 = (0..len)
                    .map(|k| g[base + k * inner] * y[base + k * inner])
                    .sum();
                for k in 0..len {
                    let idx = base + k * inner;
                    grad[idx] = y[idx] * (g[idx] - dot);
                }
            }
        }
        drop(y_guard);
        drop(g_guard);
        Ok(vec![Tensor::new(grad, shape)?])
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.input.clone()]
    }
}

/// Normalizes `input` along `dim` with the softmax function.
///
/// Each slice along `dim` is shifted by its maximum before exponentiation.
///
/// # Errors
/// `IndexOutOfBounds` if `dim` is not smaller than the input rank.
pub fn softmax_op(input: &Tensor, dim: usize) -> Result<Tensor, NeuraRustError> {
    let guard = input.read_data();
    let shape = guard.shape.clone();
    if dim >= shape.len() {
        return Err(NeuraRustError::IndexOutOfBounds {
            index: vec![dim],
            shape,
        });
    }
    let (outer, len, inner) = split_at_dim(&shape, dim);
    let x = &guard.buffer;

    let mut output = vec![0.0f32; x.len()];
    for o in 0..outer {
        for i in 0..inner {
            let base = o * len * inner + i;
            let max = (0..len)
                .map(|k| x[base + k * inner])
                .fold(f32::NEG_INFINITY, f32::max);
            let mut denom = 0.0f32;
            for k in 0..len {
                let e = (x[base + k * inner] - max).exp();
                output[base + k * inner] = e;
                denom += e;
            }
            for k in 0..len {
                output[base + k * inner] /= denom;
            }
        }
    }
    drop(guard);

    let result = Tensor::new(output, shape)?;
    if needs_grad(&[input]) {
        link_backward(
            &result,
            SoftmaxBackward {
                input: input.clone(),
                output: result.detach(),
                dim,
            },
        );
    }
    Ok(result)
}

#[cfg(test)]
#[path = "softmax_test.rs"]
mod tests;
