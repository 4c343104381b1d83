//! Fixture classification models with reproducible weights.

use neurarust_core::nn::{Linear, ReLU, Sequential, Sigmoid, Softmax};
use neurarust_core::{NeuraRustError, Tensor};

/// Pseudo-random value in `[-1, 1)` for weight index `k` of layer `seed`.
fn hash_unit(k: usize, seed: usize) -> f32 {
    let v = ((k as f64) * 12.9898 + (seed as f64) * 78.233).sin() * 43758.5453;
    ((v - v.floor()) * 2.0 - 1.0) as f32
}

/// A `Linear` layer with weights spread over `±1/sqrt(in_features)`, like the default init.
pub fn fixture_linear(in_features: usize, out_features: usize, seed: usize) -> Result<Linear, NeuraRustError> {
    let bound = 1.0 / (in_features as f32).sqrt();
    let weight: Vec<f32> = (0..out_features * in_features)
        .map(|k| bound * hash_unit(k, seed))
        .collect();
    let bias: Vec<f32> = (0..out_features)
        .map(|o| bound * hash_unit(100_000 + o, seed))
        .collect();
    Linear::from_tensors(
        Tensor::new(weight, vec![out_features, in_features])?,
        Some(Tensor::new(bias, vec![out_features])?),
    )
}

/// `lin1 -> relu -> lin2 -> sigmoid`
pub fn sigmoid_model(num_in: usize, num_hidden: usize, num_out: usize) -> Result<Sequential, NeuraRustError> {
    Ok(Sequential::new()
        .with("lin1", fixture_linear(num_in, num_hidden, 1)?)
        .with("relu1", ReLU::new())
        .with("lin2", fixture_linear(num_hidden, num_out, 2)?)
        .with("sigmoid", Sigmoid::new()))
}

/// `lin1 -> relu -> lin2 -> relu -> lin3 -> softmax`
pub fn softmax_model(num_in: usize, num_hidden: usize, num_out: usize) -> Result<Sequential, NeuraRustError> {
    Ok(Sequential::new()
        .with("lin1", fixture_linear(num_in, num_hidden, 1)?)
        .with("relu1", ReLU::new())
        .with("lin2", fixture_linear(num_hidden, num_hidden, 2)?)
        .with("relu2", ReLU::new())
        .with("lin3", fixture_linear(num_hidden, num_out, 3)?)
        .with("softmax", Softmax::new(1)))
}

/// `[[0, 1, ..., rows * cols - 1]]` laid out as `(rows, cols)`.
pub fn arange_input(rows: usize, cols: usize) -> Result<Tensor, NeuraRustError> {
    neurarust_core::tensor::arange(0.0, (rows * cols) as f32, 1.0)?.view_detached(vec![rows, cols])
}

#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
