pub mod relu;
pub mod sigmoid;
pub mod softmax;

pub use relu::relu_op;
pub use sigmoid::sigmoid_op;
pub use softmax::softmax_op;
