use crate::error::NeuraRustError;
use crate::tensor::utils::{broadcast_offset, broadcast_shapes, calculate_strides, index_to_coord};
use crate::tensor::Tensor;

impl Tensor {
    /// Reduces the tensor (gradient) to match a target shape by summing along broadcasted dimensions.
    ///
    /// Crucial for the backward pass of broadcasting ops: the gradient of an input that was
    /// broadcast is the sum of the output gradient over the broadcast dimensions.
    /// The result is a fresh tensor without autograd history.
    pub fn reduce_to_shape(&self, target_shape: &[usize]) -> Result<Tensor, NeuraRustError> {
        let guard = self.read_data();
        if guard.shape == target_shape {
            drop(guard);
            return Ok(self.clone());
        }

        let current_shape = guard.shape.clone();
        if broadcast_shapes(&current_shape, target_shape)? != current_shape {
            return Err(NeuraRustError::ShapeMismatch {
                expected: target_shape.to_vec(),
                actual: current_shape,
                operation: "reduce_to_shape".to_string(),
            });
        }

        let target_strides = calculate_strides(target_shape);
        let target_numel: usize = target_shape.iter().product();
        let mut reduced = vec![0.0f32; target_numel];
        for (i, &val) in guard.buffer.iter().enumerate() {
            let coords = index_to_coord(i, &current_shape);
            reduced[broadcast_offset(&coords, target_shape, &target_strides)] += val;
        }
        drop(guard);
        Tensor::new(reduced, target_shape.to_vec())
    }

    /// Materializes the broadcast of this tensor to `target_shape`.
    pub fn expand_to_shape(&self, target_shape: &[usize]) -> Result<Tensor, NeuraRustError> {
        let guard = self.read_data();
        if guard.shape == target_shape {
            drop(guard);
            return Ok(self.clone());
        }
        if broadcast_shapes(&guard.shape, target_shape)? != target_shape {
            return Err(NeuraRustError::BroadcastError {
                shape1: guard.shape.clone(),
                shape2: target_shape.to_vec(),
            });
        }

        let target_numel: usize = target_shape.iter().product();
        let expanded: Vec<f32> = (0..target_numel)
            .map(|i| {
                let coords = index_to_coord(i, target_shape);
                guard.buffer[broadcast_offset(&coords, &guard.shape, &guard.strides)]
            })
            .collect();
        drop(guard);
        Tensor::new(expanded, target_shape.to_vec())
    }
}
