//! Tensor plumbing shared by the attribution methods.

use neurarust_core::tensor::zeros;
use neurarust_core::Tensor;

use crate::error::AttributionError;

/// How [`tensors_almost_equal`] folds element-wise differences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToleranceMode {
    /// Sum of absolute differences.
    #[default]
    Sum,
    /// Largest absolute difference.
    Max,
}

/// Returns the batch size of `inputs`, rejecting scalars and empty batches.
pub(crate) fn batch_size(inputs: &Tensor) -> Result<usize, AttributionError> {
    let shape = inputs.shape();
    match shape.first() {
        Some(&batch) if batch > 0 => Ok(batch),
        _ => Err(AttributionError::EmptyBatch { shape }),
    }
}

/// Materializes `baselines` at the full shape of `inputs`.
///
/// `None` means an all-zero baseline. Accepted shapes are the input shape, a single
/// row `(1, features...)`, or the per-example feature shape `(features...)`.
pub fn tensorize_baseline(
    inputs: &Tensor,
    baselines: Option<&Tensor>,
) -> Result<Tensor, AttributionError> {
    let input_shape = inputs.shape();
    if input_shape.is_empty() {
        return Err(AttributionError::EmptyBatch { shape: input_shape });
    }
    let Some(baseline) = baselines else {
        return Ok(zeros(&input_shape)?);
    };
    let baseline_shape = baseline.shape();
    let fits = baseline_shape == input_shape
        || (baseline_shape.len() == input_shape.len()
            && baseline_shape.first() == Some(&1)
            && baseline_shape[1..] == input_shape[1..])
        || baseline_shape[..] == input_shape[1..];
    if !fits {
        return Err(AttributionError::BaselineShapeMismatch {
            input: input_shape,
            baseline: baseline_shape,
        });
    }
    Ok(baseline.detach().expand_to_shape(&input_shape)?)
}

/// Repeats every row (first-axis slice) of `tensor` `n` times in place.
pub(crate) fn repeat_interleave_rows(tensor: &Tensor, n: usize) -> Result<Tensor, AttributionError> {
    let mut shape = tensor.shape();
    let data = tensor.get_f32_data()?;
    let rows = shape.first().copied().unwrap_or(1);
    let row_len = if rows == 0 { 0 } else { data.len() / rows };
    let mut repeated = Vec::with_capacity(data.len() * n);
    for row in data.chunks(row_len.max(1)) {
        for _ in 0..n {
            repeated.extend_from_slice(row);
        }
    }
    if let Some(first) = shape.first_mut() {
        *first *= n;
    }
    Ok(Tensor::new(repeated, shape)?)
}

/// Sums every row of `tensor` over all non-batch axes, accumulating in `f64`.
pub(crate) fn row_sums(tensor: &Tensor) -> Result<Vec<f64>, AttributionError> {
    let batch = batch_size(tensor)?;
    let data = tensor.get_f32_data()?;
    let row_len = data.len() / batch;
    Ok(data
        .chunks(row_len.max(1))
        .map(|row| row.iter().map(|&v| v as f64).sum())
        .collect())
}

/// True if `actual` and `expected` have the same shape and their element-wise
/// absolute differences, folded with `mode`, do not exceed `delta`.
pub fn tensors_almost_equal(
    actual: &Tensor,
    expected: &Tensor,
    delta: f32,
    mode: ToleranceMode,
) -> Result<bool, AttributionError> {
    if actual.shape() != expected.shape() {
        return Ok(false);
    }
    let a = actual.get_f32_data()?;
    let e = expected.get_f32_data()?;
    let diffs = a.iter().zip(e.iter()).map(|(x, y)| ((x - y) as f64).abs());
    let folded = match mode {
        ToleranceMode::Sum => diffs.sum::<f64>(),
        ToleranceMode::Max => diffs.fold(0.0, f64::max),
    };
    Ok(folded <= delta as f64)
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
