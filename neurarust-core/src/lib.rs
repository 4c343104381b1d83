//! Minimal `f32` tensor library with reverse-mode automatic differentiation.
//!
//! Provides the building blocks needed to run and differentiate small feed-forward
//! classifiers: tensors, a dynamic computation graph, a handful of ops and `nn` layers.

// Déclare les modules principaux de la crate
pub mod autograd;
pub mod error;
pub mod nn;
pub mod ops;
pub mod tensor;
pub mod tensor_data;
pub mod utils;

// Ré-exporte le type Tensor pour qu'il soit accessible directement via `neurarust_core::Tensor`
pub use error::NeuraRustError;
pub use tensor::Tensor;
