// src/tensor/create.rs

use crate::error::NeuraRustError;
use crate::tensor::Tensor;
use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};

/// Creates a new tensor filled with zeros with the specified shape.
pub fn zeros(shape: &[usize]) -> Result<Tensor, NeuraRustError> {
    full(shape, 0.0)
}

/// Creates a new tensor filled with ones with the specified shape.
pub fn ones(shape: &[usize]) -> Result<Tensor, NeuraRustError> {
    full(shape, 1.0)
}

/// Creates a new tensor filled with `value` with the specified shape.
pub fn full(shape: &[usize], value: f32) -> Result<Tensor, NeuraRustError> {
    let numel = shape.iter().product();
    Tensor::new(vec![value; numel], shape.to_vec())
}

/// Creates a new tensor filled with zeros, having the same shape as the input tensor.
pub fn zeros_like(tensor: &Tensor) -> Result<Tensor, NeuraRustError> {
    zeros(&tensor.shape())
}

/// Creates a new tensor filled with ones, having the same shape as the input tensor.
pub fn ones_like(tensor: &Tensor) -> Result<Tensor, NeuraRustError> {
    ones(&tensor.shape())
}

/// 1-D tensor `[start, start + step, ...]` stopping before `end`.
pub fn arange(start: f32, end: f32, step: f32) -> Result<Tensor, NeuraRustError> {
    if step == 0.0 || !step.is_finite() || (end - start) * step < 0.0 {
        return Err(NeuraRustError::InvalidArgument {
            operation: "arange".to_string(),
            message: format!("cannot step from {} to {} by {}", start, end, step),
        });
    }
    let len = ((end - start) / step).ceil().max(0.0) as usize;
    let data: Vec<f32> = (0..len).map(|i| start + i as f32 * step).collect();
    Tensor::new(data, vec![len])
}

/// Samples a tensor from `N(mean, std^2)` using the provided RNG.
pub fn randn<R: Rng + ?Sized>(
    shape: &[usize],
    mean: f32,
    std: f32,
    rng: &mut R,
) -> Result<Tensor, NeuraRustError> {
    let normal = Normal::new(mean, std).map_err(|e| NeuraRustError::InvalidArgument {
        operation: "randn".to_string(),
        message: e.to_string(),
    })?;
    let numel = shape.iter().product();
    let data: Vec<f32> = (0..numel).map(|_| normal.sample(rng)).collect();
    Tensor::new(data, shape.to_vec())
}

/// Samples a tensor uniformly from `[low, high)` using the provided RNG.
pub fn uniform<R: Rng + ?Sized>(
    shape: &[usize],
    low: f32,
    high: f32,
    rng: &mut R,
) -> Result<Tensor, NeuraRustError> {
    if !(low < high) {
        return Err(NeuraRustError::InvalidArgument {
            operation: "uniform".to_string(),
            message: format!("empty range [{}, {})", low, high),
        });
    }
    let dist = Uniform::new(low, high);
    let numel = shape.iter().product();
    let data: Vec<f32> = (0..numel).map(|_| dist.sample(rng)).collect();
    Tensor::new(data, shape.to_vec())
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
