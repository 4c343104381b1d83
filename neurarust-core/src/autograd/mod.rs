//! # Automatic differentiation
//!
//! Reverse-mode autograd over the graph of [`BackwardOp`] nodes recorded by tensor
//! operations. [`Tensor::backward`](crate::tensor::Tensor::backward) accumulates into
//! leaf gradients; [`grad`] returns gradients for chosen tensors without touching any
//! `.grad` field.

pub mod backward_op;
pub mod grad_mode;
pub mod graph;

pub use backward_op::BackwardOp;
pub use grad_mode::{is_grad_enabled, no_grad, NoGradGuard};
pub use graph::{grad, NodeId};
