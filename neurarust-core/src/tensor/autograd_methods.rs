use crate::autograd::{graph, BackwardOp};
use crate::error::NeuraRustError;
use crate::ops::arithmetic::add_op;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use std::sync::Arc;

impl Tensor {
    /// Checks if this tensor requires gradient computation.
    pub fn requires_grad(&self) -> bool {
        self.read_data().requires_grad
    }

    /// Sets the `requires_grad` status of this tensor **in-place**.
    /// Only allowed on leaf tensors.
    pub fn requires_grad_(&self, requires_grad: bool) -> Result<(), NeuraRustError> {
        let mut guard = self.write_data();
        if guard.grad_fn.is_some() {
            return Err(NeuraRustError::RequiresGradOnNonLeaf);
        }
        guard.requires_grad = requires_grad;
        Ok(())
    }

    /// Returns the backward node that produced this tensor, if any.
    pub fn grad_fn(&self) -> Option<Arc<dyn BackwardOp>> {
        self.read_data().grad_fn.clone()
    }

    /// Returns a clone of the accumulated gradient, if any.
    pub fn grad(&self) -> Option<Tensor> {
        self.read_data().grad.clone()
    }

    /// Marks this tensor as the output of `op`.
    pub(crate) fn set_grad_fn(&self, op: Arc<dyn BackwardOp>) {
        let mut guard = self.write_data();
        guard.requires_grad = true;
        guard.grad_fn = Some(op);
    }

    /// Accumulates `grad_to_add` into this tensor's `grad` field.
    pub fn acc_grad(&self, grad_to_add: Tensor) -> Result<(), NeuraRustError> {
        let expected = self.shape();
        if grad_to_add.shape() != expected {
            return Err(NeuraRustError::ShapeMismatch {
                expected,
                actual: grad_to_add.shape(),
                operation: "acc_grad".to_string(),
            });
        }
        let existing = self.write_data().grad.take();
        let new_grad = match existing {
            Some(existing_grad) => add_op(&existing_grad, &grad_to_add)?.detach(),
            None => grad_to_add.detach(),
        };
        self.write_data().grad = Some(new_grad);
        Ok(())
    }

    /// Creates a new tensor that shares the same data but is detached
    /// from the computation graph.
    pub fn detach(&self) -> Tensor {
        let guard = self.read_data();
        Tensor::from_data(TensorData {
            buffer: Arc::clone(&guard.buffer),
            shape: guard.shape.clone(),
            strides: guard.strides.clone(),
            requires_grad: false,
            grad: None,
            grad_fn: None,
        })
    }

    /// Computes the gradients of this tensor w.r.t. graph leaves.
    ///
    /// `gradient` seeds the pass; it may be omitted for single-element tensors.
    pub fn backward(&self, gradient: Option<Tensor>) -> Result<(), NeuraRustError> {
        if !self.requires_grad() {
            return Err(NeuraRustError::RequiresGradNotMet);
        }
        if self.grad_fn().is_none() {
            log::debug!("backward() called on a leaf tensor. No operation to perform.");
            return Ok(());
        }
        graph::backward(self, gradient)
    }

    /// Resets the gradient of this tensor to None.
    pub fn zero_grad(&self) {
        self.write_data().grad = None;
    }
}

impl Clone for Tensor {
    fn clone(&self) -> Self {
        Tensor {
            data: Arc::clone(&self.data),
        }
    }
}

#[cfg(test)]
#[path = "autograd_methods_test.rs"]
mod tests;
