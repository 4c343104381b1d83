use crate::error::NeuraRustError;
use crate::nn::Parameter;
use crate::tensor::Tensor;

/// The base trait for all neural network modules (layers, containers, etc.).
///
/// This trait defines the fundamental operations that any neural network module
/// should support, such as performing a forward pass and accessing its parameters.
pub trait Module: std::fmt::Debug + Send + Sync {
    /// Performs a forward pass of the module.
    fn forward(&self, input: &Tensor) -> Result<Tensor, NeuraRustError>;

    /// Returns all learnable parameters of the module, including those of sub-modules.
    fn parameters(&self) -> Vec<&Parameter>;

    /// Returns all learnable parameters along with their hierarchical names
    /// (e.g., "lin1.weight", "lin1.bias").
    fn named_parameters(&self) -> Vec<(String, &Parameter)>;

    /// Clears the accumulated gradient of every parameter.
    fn zero_grad(&self) {
        for param in self.parameters() {
            param.zero_grad();
        }
    }
}
