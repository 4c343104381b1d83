//! Integrated gradients: the path integral of the gradient along the straight line
//! from a baseline to the input, approximated with a quadrature rule.

use neurarust_core::autograd::no_grad;
use neurarust_core::{NeuraRustError, Tensor};

use crate::attribution::{Attribution, AttributionOutput, AttributionRequest};
use crate::common::{batch_size, row_sums, tensorize_baseline};
use crate::error::AttributionError;
use crate::gradient::compute_gradients;
use crate::target::{select_targets, ExpansionType, Target};

/// Integrated gradients over a differentiable `forward` function.
pub struct IntegratedGradients<F> {
    forward: F,
    multiply_by_inputs: bool,
}

impl<F> IntegratedGradients<F>
where
    F: Fn(&Tensor) -> Result<Tensor, NeuraRustError>,
{
    pub fn new(forward: F) -> Self {
        IntegratedGradients {
            forward,
            multiply_by_inputs: true,
        }
    }

    /// With `false`, attributions are the integrated gradients alone (global
    /// attribution) instead of being scaled by `input - baseline`.
    pub fn with_multiply_by_inputs(mut self, multiply_by_inputs: bool) -> Self {
        self.multiply_by_inputs = multiply_by_inputs;
        self
    }

    pub fn multiplies_by_inputs(&self) -> bool {
        self.multiply_by_inputs
    }

    /// Sum over steps of `step_size * gradient` at `baseline + alpha (input - baseline)`.
    fn integrate_gradients(
        &self,
        inputs: &Tensor,
        baselines: &Tensor,
        target: &Target,
        step_sizes: &[f64],
        alphas: &[f64],
        steps_per_chunk: usize,
    ) -> Result<Vec<f64>, AttributionError> {
        let shape = inputs.shape();
        let inputs = inputs.get_f32_data()?;
        let baselines = baselines.get_f32_data()?;
        let numel = inputs.len();
        let mut total_grads = vec![0.0f64; numel];
        if numel == 0 {
            return Ok(total_grads);
        }

        for (chunk_sizes, chunk_alphas) in step_sizes
            .chunks(steps_per_chunk)
            .zip(alphas.chunks(steps_per_chunk))
        {
            let n_chunk = chunk_alphas.len();
            // Step-major: every example at alpha_0, then every example at alpha_1, ...
            let mut scaled = Vec::with_capacity(numel * n_chunk);
            for &alpha in chunk_alphas {
                let alpha = alpha as f32;
                scaled.extend(
                    inputs
                        .iter()
                        .zip(baselines.iter())
                        .map(|(&x, &b)| b + alpha * (x - b)),
                );
            }
            let mut scaled_shape = shape.clone();
            scaled_shape[0] *= n_chunk;
            let scaled_inputs = Tensor::new(scaled, scaled_shape)?;
            let chunk_target = target.expand(n_chunk, ExpansionType::Repeat);

            let grads = compute_gradients(&self.forward, &scaled_inputs, &chunk_target)?;
            let grads = grads.get_f32_data()?;
            for (step_grads, &step_size) in grads.chunks(numel).zip(chunk_sizes.iter()) {
                for (total, &g) in total_grads.iter_mut().zip(step_grads.iter()) {
                    *total += step_size * g as f64;
                }
            }
        }
        Ok(total_grads)
    }
}

impl<F> Attribution for IntegratedGradients<F>
where
    F: Fn(&Tensor) -> Result<Tensor, NeuraRustError>,
{
    fn name(&self) -> &'static str {
        "IntegratedGradients"
    }

    fn attribute(
        &self,
        inputs: &Tensor,
        request: &AttributionRequest,
    ) -> Result<AttributionOutput, AttributionError> {
        let batch = batch_size(inputs)?;
        let shape = inputs.shape();
        let baselines = tensorize_baseline(inputs, request.baselines.as_ref())?;
        let (step_sizes, alphas) = request.method.step_sizes_and_alphas(request.n_steps)?;

        let steps_per_chunk = match request.internal_batch_size {
            Some(ibs) => (ibs / batch).max(1),
            None => request.n_steps,
        };
        log::debug!(
            "{}: {} examples, {} steps of {}, {} steps per forward pass",
            self.name(),
            batch,
            request.n_steps,
            request.method,
            steps_per_chunk
        );

        let total_grads = self.integrate_gradients(
            inputs,
            &baselines,
            &request.target,
            &step_sizes,
            &alphas,
            steps_per_chunk,
        )?;

        let input_data = inputs.get_f32_data()?;
        let baseline_data = baselines.get_f32_data()?;
        let attribution_data: Vec<f32> = if self.multiply_by_inputs {
            total_grads
                .iter()
                .zip(input_data.iter().zip(baseline_data.iter()))
                .map(|(&g, (&x, &b))| (g * (x as f64 - b as f64)) as f32)
                .collect()
        } else {
            total_grads.iter().map(|&g| g as f32).collect()
        };
        let attributions = Tensor::new(attribution_data, shape)?;

        let delta = if request.return_convergence_delta {
            Some(self.compute_convergence_delta(
                &attributions,
                Some(&baselines),
                inputs,
                &request.target,
            )?)
        } else {
            None
        };
        Ok(AttributionOutput {
            attributions,
            delta,
        })
    }

    fn has_convergence_delta(&self) -> bool {
        true
    }

    /// `sum(attributions_row) - (forward(end)_t - forward(start)_t)` for every example.
    ///
    /// Outputs are evaluated without recording a graph.
    fn compute_convergence_delta(
        &self,
        attributions: &Tensor,
        start_point: Option<&Tensor>,
        end_point: &Tensor,
        target: &Target,
    ) -> Result<Tensor, AttributionError> {
        let end_shape = end_point.shape();
        if attributions.shape() != end_shape {
            return Err(AttributionError::AttributionShapeMismatch {
                expected: end_shape,
                actual: attributions.shape(),
            });
        }
        let batch = batch_size(end_point)?;
        let start_point = tensorize_baseline(end_point, start_point)?;

        let (start_out, end_out) = no_grad(|| -> Result<(Tensor, Tensor), AttributionError> {
            let start = select_targets(&(self.forward)(&start_point)?, target)?;
            let end = select_targets(&(self.forward)(end_point)?, target)?;
            Ok((start, end))
        })?;
        let start_out = start_out.get_f32_data()?;
        let end_out = end_out.get_f32_data()?;

        let attribution_sums = row_sums(attributions)?;
        let delta: Vec<f32> = attribution_sums
            .iter()
            .zip(start_out.iter().zip(end_out.iter()))
            .map(|(&sum, (&s, &e))| (sum - (e as f64 - s as f64)) as f32)
            .collect();
        log::trace!("{}: convergence delta {:?}", self.name(), delta);
        Ok(Tensor::new(delta, vec![batch])?)
    }
}

#[cfg(test)]
#[path = "integrated_gradients_test.rs"]
mod tests;
