use crate::error::NeuraRustError;
use crate::tensor::utils::{broadcast_offset, broadcast_shapes, index_to_coord};
use crate::tensor::Tensor;

pub mod add;
pub mod mul;
pub mod sub;

pub use add::add_op;
pub use mul::mul_op;
pub use sub::sub_op;

/// Element-wise binary kernel with NumPy-style broadcasting.
pub(crate) fn broadcast_binary<F>(a: &Tensor, b: &Tensor, f: F) -> Result<Tensor, NeuraRustError>
where
    F: Fn(f32, f32) -> f32,
{
    let a_guard = a.read_data();
    let b_guard = b.read_data();

    if a_guard.shape == b_guard.shape {
        let output: Vec<f32> = a_guard
            .buffer
            .iter()
            .zip(b_guard.buffer.iter())
            .map(|(&x, &y)| f(x, y))
            .collect();
        let shape = a_guard.shape.clone();
        drop(a_guard);
        drop(b_guard);
        return Tensor::new(output, shape);
    }

    let output_shape = broadcast_shapes(&a_guard.shape, &b_guard.shape)?;
    let numel: usize = output_shape.iter().product();
    let mut output = Vec::with_capacity(numel);
    for i in 0..numel {
        let coords = index_to_coord(i, &output_shape);
        let x = a_guard.buffer[broadcast_offset(&coords, &a_guard.shape, &a_guard.strides)];
        let y = b_guard.buffer[broadcast_offset(&coords, &b_guard.shape, &b_guard.strides)];
        output.push(f(x, y));
    }
    drop(a_guard);
    drop(b_guard);
    Tensor::new(output, output_shape)
}
