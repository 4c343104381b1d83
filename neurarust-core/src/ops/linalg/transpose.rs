use crate::autograd::BackwardOp;
use crate::error::NeuraRustError;
use crate::ops::{link_backward, needs_grad};
use crate::tensor::Tensor;

#[derive(Debug)]
struct TransposeBackward {
    input: Tensor,
}

impl BackwardOp for TransposeBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuraRustError> {
        Ok(vec![transpose_op(grad_output)?])
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.input.clone()]
    }
}

/// Transposes a 2-D tensor, returning a contiguous copy of shape `[cols, rows]`.
pub fn transpose_op(input: &Tensor) -> Result<Tensor, NeuraRustError> {
    let guard = input.read_data();
    if guard.shape.len() != 2 {
        return Err(NeuraRustError::RankMismatch {
            expected: 2,
            actual: guard.shape.len(),
            operation: "transpose".to_string(),
        });
    }
    let (rows, cols) = (guard.shape[0], guard.shape[1]);
    let mut transposed = vec![0.0f32; rows * cols];
    for r in 0..rows {
        for c in 0..cols {
            transposed[c * rows + r] = guard.buffer[r * cols + c];
        }
    }
    drop(guard);

    let output = Tensor::new(transposed, vec![cols, rows])?;
    if needs_grad(&[input]) {
        link_backward(&output, TransposeBackward { input: input.clone() });
    }
    Ok(output)
}
