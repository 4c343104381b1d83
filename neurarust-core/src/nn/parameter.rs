use crate::tensor::Tensor;
use std::fmt;
use std::ops::Deref;

/// A wrapper around a Tensor indicating it is a learnable parameter of a Module.
/// Parameters always have `requires_grad` set to `true`.
pub struct Parameter {
    tensor: Tensor,
    name: Option<String>,
}

impl Parameter {
    /// Creates a new named Parameter from a Tensor.
    ///
    /// The tensor is detached first, so the parameter is always a graph leaf.
    pub fn new(tensor: Tensor, name: Option<String>) -> Self {
        let tensor = tensor.detach();
        tensor.write_data().requires_grad = true;
        Parameter { tensor, name }
    }

    pub fn new_unnamed(tensor: Tensor) -> Self {
        Self::new(tensor, None)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

// Allow accessing the underlying Tensor immutably via Deref.
impl Deref for Parameter {
    type Target = Tensor;

    fn deref(&self) -> &Self::Target {
        &self.tensor
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "Parameter[{}]({:?})", name, self.tensor),
            None => write!(f, "Parameter({:?})", self.tensor),
        }
    }
}

impl Clone for Parameter {
    /// Cloning a Parameter clones the tensor handle; storage and gradient are shared.
    fn clone(&self) -> Self {
        Parameter {
            tensor: self.tensor.clone(),
            name: self.name.clone(),
        }
    }
}

#[cfg(test)]
#[path = "parameter_test.rs"]
mod tests;
