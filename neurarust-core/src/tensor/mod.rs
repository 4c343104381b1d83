// src/tensor/mod.rs

use crate::error::NeuraRustError;
use crate::tensor_data::TensorData;
use std::sync::{Arc, RwLock};

mod autograd_methods;
pub mod broadcast_utils;
pub mod create;
mod debug;
mod ops_methods;
pub mod utils;

pub use create::{arange, full, ones, ones_like, randn, uniform, zeros, zeros_like};

/// Represents a multi-dimensional array (tensor) of `f32` values on the CPU.
///
/// `Tensor` uses `Arc<RwLock<TensorData>>` internally to allow for:
/// 1.  **Shared Ownership:** cloning a `Tensor` clones the handle, not the data.
/// 2.  **Interior Mutability:** autograd metadata (`requires_grad`, `grad`) can be
///     updated through an immutable reference.
pub struct Tensor {
    pub(crate) data: Arc<RwLock<TensorData>>,
}

impl Tensor {
    /// Creates a new Tensor from row-major data and a shape.
    pub fn new(data_vec: Vec<f32>, shape: Vec<usize>) -> Result<Self, NeuraRustError> {
        let tensor_data = TensorData::new(data_vec, shape)?;
        Ok(Tensor::from_data(tensor_data))
    }

    /// Creates a 0-dimensional tensor holding `value`.
    pub fn scalar(value: f32) -> Tensor {
        Tensor::from_data(TensorData {
            buffer: Arc::new(vec![value]),
            shape: vec![],
            strides: vec![],
            requires_grad: false,
            grad: None,
            grad_fn: None,
        })
    }

    pub(crate) fn from_data(tensor_data: TensorData) -> Tensor {
        Tensor {
            data: Arc::new(RwLock::new(tensor_data)),
        }
    }

    /// Returns a clone of the tensor's shape.
    pub fn shape(&self) -> Vec<usize> {
        self.read_data().shape.clone()
    }

    pub fn strides(&self) -> Vec<usize> {
        self.read_data().strides.clone()
    }

    pub fn rank(&self) -> usize {
        self.read_data().shape.len()
    }

    pub fn numel(&self) -> usize {
        self.read_data().numel()
    }

    /// Acquires a read lock on the tensor's data.
    /// Panics if the RwLock is poisoned.
    pub fn read_data(&self) -> std::sync::RwLockReadGuard<'_, TensorData> {
        self.data.read().expect("RwLock poisoned")
    }

    /// Acquires a write lock on the tensor's data.
    /// Panics if the RwLock is poisoned.
    pub fn write_data(&self) -> std::sync::RwLockWriteGuard<'_, TensorData> {
        self.data.write().expect("RwLock poisoned")
    }

    /// Copies the tensor data into an owned `Vec<f32>` (row-major).
    pub fn get_f32_data(&self) -> Result<Vec<f32>, NeuraRustError> {
        Ok(self.read_data().buffer.as_ref().clone())
    }

    /// Returns the single value of a one-element tensor.
    pub fn item(&self) -> Result<f32, NeuraRustError> {
        let guard = self.read_data();
        if guard.numel() != 1 {
            return Err(NeuraRustError::ShapeMismatch {
                expected: vec![],
                actual: guard.shape.clone(),
                operation: "item".to_string(),
            });
        }
        Ok(guard.buffer[0])
    }

    /// Returns a tensor sharing this tensor's buffer under `new_shape`.
    ///
    /// The result is detached from the graph; it is meant for reinterpreting
    /// data (gradients, attributions) rather than for differentiable reshapes.
    pub fn view_detached(&self, new_shape: Vec<usize>) -> Result<Tensor, NeuraRustError> {
        let buffer = Arc::clone(&self.read_data().buffer);
        Ok(Tensor::from_data(TensorData::from_shared(buffer, new_shape)?))
    }
}
