//! Parameter initialization schemes.

use crate::error::NeuraRustError;
use crate::tensor::{uniform, Tensor};
use rand::Rng;

/// Bound of the default `Linear` initialization, `1 / sqrt(fan_in)`.
///
/// This is what Kaiming-uniform with `a = sqrt(5)` reduces to.
pub fn linear_init_bound(fan_in: usize) -> f32 {
    if fan_in == 0 {
        0.0
    } else {
        1.0 / (fan_in as f32).sqrt()
    }
}

/// Samples a tensor uniformly from `[-bound, bound)` with `bound = 1 / sqrt(fan_in)`.
pub fn kaiming_uniform<R: Rng + ?Sized>(
    shape: &[usize],
    fan_in: usize,
    rng: &mut R,
) -> Result<Tensor, NeuraRustError> {
    let bound = linear_init_bound(fan_in);
    if bound == 0.0 {
        return crate::tensor::zeros(shape);
    }
    uniform(shape, -bound, bound, rng)
}

#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
