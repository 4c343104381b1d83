//! # Tensor Operations Module (`ops`)
//!
//! Operations are grouped into submodules by functionality. Each operation has a core
//! `xxx_op` function that performs the forward computation and, when any input requires
//! gradients and grad mode is enabled, links an `XxxBackward` node implementing
//! [`BackwardOp`] to the output. `Tensor` methods in `tensor::ops_methods` are thin
//! wrappers around these functions.
//!
//! - [`arithmetic`]: broadcasting element-wise add, sub, mul.
//! - [`linalg`]: 2-D matmul and transpose.
//! - [`reduction`]: sums over axes.
//! - [`activation`]: relu, sigmoid, softmax.
//! - [`view`]: gather (per-row column selection).

use crate::autograd::{is_grad_enabled, BackwardOp};
use crate::error::NeuraRustError;
use crate::tensor::Tensor;
use std::sync::Arc;

pub mod activation;
pub mod arithmetic;
pub mod linalg;
pub mod reduction;
pub mod view;

/// True if an op over `inputs` must record a backward node.
pub(crate) fn needs_grad(inputs: &[&Tensor]) -> bool {
    is_grad_enabled() && inputs.iter().any(|t| t.requires_grad())
}

/// Applies an element-wise function to a tensor. The result has no autograd history.
pub(crate) fn map_unary<F>(a: &Tensor, f: F) -> Result<Tensor, NeuraRustError>
where
    F: Fn(f32) -> f32,
{
    let guard = a.read_data();
    let output: Vec<f32> = guard.buffer.iter().map(|&x| f(x)).collect();
    let shape = guard.shape.clone();
    drop(guard);
    Tensor::new(output, shape)
}

/// Attaches `op` as the grad_fn of `output`.
pub(crate) fn link_backward<B: BackwardOp + 'static>(output: &Tensor, op: B) {
    let op: Arc<dyn BackwardOp> = Arc::new(op);
    output.set_grad_fn(op);
}
