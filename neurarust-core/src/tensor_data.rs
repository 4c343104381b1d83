// src/tensor_data.rs
use std::fmt::Debug;
use std::sync::Arc;

use crate::autograd::BackwardOp;
use crate::error::NeuraRustError;
use crate::tensor::utils::calculate_strides;
use crate::tensor::Tensor;

/// Internal storage and metadata for a Tensor.
///
/// Holds the `f32` data buffer, the shape and contiguous strides, and the
/// autograd metadata. It is wrapped in `Arc<RwLock<TensorData>>` by `Tensor`
/// so that clones share storage and gradients can be attached through an
/// immutable handle.
#[derive(Debug)]
pub struct TensorData {
    /// Row-major element buffer. Shared by `detach()`ed handles and reshapes.
    pub(crate) buffer: Arc<Vec<f32>>,
    pub(crate) shape: Vec<usize>,
    pub(crate) strides: Vec<usize>,

    /// If true, operations involving this tensor are recorded in the graph.
    pub(crate) requires_grad: bool,
    /// Gradient accumulated by `Tensor::backward()` (leaves only).
    pub(crate) grad: Option<Tensor>,
    /// Operation that produced this tensor. `None` for leaves.
    pub(crate) grad_fn: Option<Arc<dyn BackwardOp>>,
}

impl TensorData {
    /// Creates a new `TensorData` from row-major `f32` data.
    ///
    /// # Errors
    /// Returns `NeuraRustError::TensorCreationError` if the length of `data_vec`
    /// does not match the number of elements described by `shape`.
    pub fn new(data_vec: Vec<f32>, shape: Vec<usize>) -> Result<Self, NeuraRustError> {
        Self::from_shared(Arc::new(data_vec), shape)
    }

    /// Wraps an already shared buffer under a (possibly different) shape.
    pub(crate) fn from_shared(
        buffer: Arc<Vec<f32>>,
        shape: Vec<usize>,
    ) -> Result<Self, NeuraRustError> {
        let numel: usize = shape.iter().product();
        if buffer.len() != numel {
            return Err(NeuraRustError::TensorCreationError {
                data_len: buffer.len(),
                shape,
            });
        }
        let strides = calculate_strides(&shape);
        Ok(TensorData {
            buffer,
            shape,
            strides,
            requires_grad: false,
            grad: None,
            grad_fn: None,
        })
    }

    /// Provides immutable access to the underlying shared buffer.
    pub fn buffer(&self) -> &Arc<Vec<f32>> {
        &self.buffer
    }

    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    /// Linear offset of `indices` into the buffer.
    ///
    /// # Errors
    /// `RankMismatch` if the number of indices differs from the rank,
    /// `IndexOutOfBounds` if any index exceeds its dimension.
    pub fn get_offset(&self, indices: &[usize]) -> Result<usize, NeuraRustError> {
        if indices.len() != self.shape.len() {
            return Err(NeuraRustError::RankMismatch {
                expected: self.shape.len(),
                actual: indices.len(),
                operation: "get_offset".to_string(),
            });
        }
        let mut offset = 0;
        for (dim, (&idx, &size)) in indices.iter().zip(self.shape.iter()).enumerate() {
            if idx >= size {
                return Err(NeuraRustError::IndexOutOfBounds {
                    index: indices.to_vec(),
                    shape: self.shape.clone(),
                });
            }
            offset += idx * self.strides[dim];
        }
        Ok(offset)
    }
}
