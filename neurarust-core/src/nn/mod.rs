// src/nn/mod.rs
// Module principal pour les couches de réseau de neurones, les conteneurs, etc.

pub mod init;
pub mod layers;
pub mod module; // Trait Module
pub mod parameter; // struct Parameter
pub mod sequential;

// Re-export common items
pub use layers::{Linear, ReLU, Sigmoid, Softmax};
pub use module::Module;
pub use parameter::Parameter;
pub use sequential::Sequential;
