// Indexing views over tensors.

pub mod gather;

pub use gather::gather_op;
