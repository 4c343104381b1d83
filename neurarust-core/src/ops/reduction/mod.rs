pub mod sum;

pub use sum::{sum_all_op, sum_axes_op};
