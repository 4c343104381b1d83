use crate::error::NeuraRustError;
use crate::tensor::Tensor;
use std::fmt::Debug;

/// Defines the interface for the backward pass of a differentiable tensor operation.
///
/// Any operation that creates a non-leaf `Tensor` must have an associated `BackwardOp`
/// implementation. It is stored in the output tensor's `grad_fn` field and is used
/// during the backward traversal to propagate gradients according to the chain rule.
///
/// The trait requires `Debug + Send + Sync` because the `Arc<dyn BackwardOp>` is shared
/// by every handle of the output tensor.
pub trait BackwardOp: Debug + Send + Sync {
    /// Computes the gradients of the operation's inputs given the gradient of its output.
    ///
    /// For an operation \( y = f(x_1, ..., x_n) \) this returns
    /// \( \frac{dL}{dx_i} = \frac{dL}{dy} \cdot \frac{dy}{dx_i} \) for each input.
    ///
    /// # Returns
    /// One gradient per input, in the order of [`BackwardOp::inputs`]. Each gradient has
    /// the shape of the corresponding input.
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuraRustError>;

    /// Returns the input tensors that participated in the forward operation.
    ///
    /// These are the predecessor nodes in the computation graph. The order must match
    /// the gradients returned by `backward()`.
    fn inputs(&self) -> Vec<Tensor>;
}
