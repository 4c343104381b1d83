use crate::autograd::BackwardOp;
use crate::error::NeuraRustError;
use crate::ops::{link_backward, needs_grad};
use crate::tensor::utils::{calculate_strides, index_to_coord};
use crate::tensor::Tensor;

/// Backward pass for summation: broadcasts the output gradient back over the reduced axes.
#[derive(Debug)]
struct SumBackward {
    input: Tensor,
    input_shape: Vec<usize>,
    /// Output shape with reduced axes kept as size 1.
    keepdim_shape: Vec<usize>,
}

impl BackwardOp for SumBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuraRustError> {
        let grad = grad_output
            .view_detached(self.keepdim_shape.clone())?
            .expand_to_shape(&self.input_shape)?;
        Ok(vec![grad])
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.input.clone()]
    }
}

/// Sums the elements of `input` over `axes`.
///
/// Reduced axes are removed from the output shape unless `keep_dims` is set, in which case
/// they are kept with size 1. Duplicate axes are ignored.
///
/// # Errors
/// `IndexOutOfBounds` if an axis is not smaller than the input rank.
pub fn sum_axes_op(input: &Tensor, axes: &[usize], keep_dims: bool) -> Result<Tensor, NeuraRustError> {
    let guard = input.read_data();
    let input_shape = guard.shape.clone();
    let rank = input_shape.len();

    if let Some(&bad) = axes.iter().find(|&&axis| axis >= rank) {
        return Err(NeuraRustError::IndexOutOfBounds {
            index: vec![bad],
            shape: input_shape,
        });
    }

    let keepdim_shape: Vec<usize> = input_shape
        .iter()
        .enumerate()
        .map(|(dim, &size)| if axes.contains(&dim) { 1 } else { size })
        .collect();
    let output_shape: Vec<usize> = if keep_dims {
        keepdim_shape.clone()
    } else {
        input_shape
            .iter()
            .enumerate()
            .filter(|(dim, _)| !axes.contains(dim))
            .map(|(_, &size)| size)
            .collect()
    };

    let keepdim_strides = calculate_strides(&keepdim_shape);
    let mut result = vec![0.0f32; keepdim_shape.iter().product()];
    for (i, &val) in guard.buffer.iter().enumerate() {
        let coords = index_to_coord(i, &input_shape);
        let out_offset: usize = coords
            .iter()
            .zip(keepdim_shape.iter().zip(keepdim_strides.iter()))
            .map(|(&c, (&size, &stride))| if size == 1 { 0 } else { c * stride })
            .sum();
        result[out_offset] += val;
    }
    drop(guard);

    let output = Tensor::new(result, output_shape)?;
    if needs_grad(&[input]) {
        link_backward(
            &output,
            SumBackward {
                input: input.clone(),
                input_shape,
                keepdim_shape,
            },
        );
    }
    Ok(output)
}

/// Sums every element of `input` into a 0-dimensional tensor.
pub fn sum_all_op(input: &Tensor) -> Result<Tensor, NeuraRustError> {
    let axes: Vec<usize> = (0..input.rank()).collect();
    sum_axes_op(input, &axes, false)
}

#[cfg(test)]
#[path = "sum_test.rs"]
mod tests;
