use crate::autograd::BackwardOp;
use crate::error::NeuraRustError;
use crate::ops::{link_backward, needs_grad};
use crate::tensor::Tensor;

/// Scatters the per-row gradient back to the selected columns.
#[derive(Debug)]
struct GatherBackward {
    input: Tensor,
    input_shape: Vec<usize>,
    indices: Vec<usize>,
}

impl BackwardOp for GatherBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuraRustError> {
        let cols = self.input_shape[1];
        let g = grad_output.get_f32_data()?;
        let mut grad = vec![0.0f32; self.input_shape.iter().product()];
        for (row, (&col, &g_row)) in self.indices.iter().zip(g.iter()).enumerate() {
            grad[row * cols + col] = g_row;
        }
        Ok(vec![Tensor::new(grad, self.input_shape.clone())?])
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.input.clone()]
    }
}

/// Picks one column per row: `output[n] = input[n, indices[n]]`.
///
/// # Errors
/// - `RankMismatch` if `input` is not 2-D.
/// - `ShapeMismatch` if `indices` does not have one entry per row.
/// - `IndexOutOfBounds` if an index is not a valid column.
pub fn gather_op(input: &Tensor, indices: &[usize]) -> Result<Tensor, NeuraRustError> {
    let guard = input.read_data();
    let shape = guard.shape.clone();
    if shape.len() != 2 {
        return Err(NeuraRustError::RankMismatch {
            expected: 2,
            actual: shape.len(),
            operation: "gather".to_string(),
        });
    }
    let (rows, cols) = (shape[0], shape[1]);
    if indices.len() != rows {
        return Err(NeuraRustError::ShapeMismatch {
            expected: vec![rows],
            actual: vec![indices.len()],
            operation: "gather indices".to_string(),
        });
    }
    let mut output = Vec::with_capacity(rows);
    for (row, &col) in indices.iter().enumerate() {
        if col >= cols {
            return Err(NeuraRustError::IndexOutOfBounds {
                index: vec![row, col],
                shape,
            });
        }
        output.push(guard.buffer[row * cols + col]);
    }
    drop(guard);

    let result = Tensor::new(output, vec![rows])?;
    if needs_grad(&[input]) {
        link_backward(
            &result,
            GatherBackward {
                input: input.clone(),
                input_shape: shape,
                indices: indices.to_vec(),
            },
        );
    }
    Ok(result)
}

#[cfg(test)]
#[path = "gather_test.rs"]
mod tests;
