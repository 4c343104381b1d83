use crate::error::NeuraRustError;
use crate::ops;
use crate::tensor::Tensor;

/// Method-call wrappers around the functions in [`crate::ops`].
impl Tensor {
    pub fn add(&self, other: &Tensor) -> Result<Tensor, NeuraRustError> {
        ops::arithmetic::add_op(self, other)
    }

    pub fn sub(&self, other: &Tensor) -> Result<Tensor, NeuraRustError> {
        ops::arithmetic::sub_op(self, other)
    }

    pub fn mul(&self, other: &Tensor) -> Result<Tensor, NeuraRustError> {
        ops::arithmetic::mul_op(self, other)
    }

    pub fn matmul(&self, other: &Tensor) -> Result<Tensor, NeuraRustError> {
        ops::linalg::matmul_op(self, other)
    }

    /// Transposes a 2-D tensor.
    pub fn transpose(&self) -> Result<Tensor, NeuraRustError> {
        ops::linalg::transpose_op(self)
    }

    pub fn sum_axes(&self, axes: &[usize], keep_dims: bool) -> Result<Tensor, NeuraRustError> {
        ops::reduction::sum_axes_op(self, axes, keep_dims)
    }

    pub fn sum_all(&self) -> Result<Tensor, NeuraRustError> {
        ops::reduction::sum_all_op(self)
    }

    pub fn relu(&self) -> Result<Tensor, NeuraRustError> {
        ops::activation::relu_op(self)
    }

    pub fn sigmoid(&self) -> Result<Tensor, NeuraRustError> {
        ops::activation::sigmoid_op(self)
    }

    pub fn softmax(&self, dim: usize) -> Result<Tensor, NeuraRustError> {
        ops::activation::softmax_op(self, dim)
    }

    /// Selects `self[n, indices[n]]` for every row `n` of a 2-D tensor.
    pub fn gather(&self, indices: &[usize]) -> Result<Tensor, NeuraRustError> {
        ops::view::gather_op(self, indices)
    }
}
