// src/nn/layers/mod.rs
// Module pour les différentes couches (Linear, activations)

pub mod activation;
pub mod linear;

// Re-export key layer structs
pub use activation::{ReLU, Sigmoid, Softmax};
pub use linear::Linear;
