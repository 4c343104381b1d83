//! Noise tunnel: averages attributions over Gaussian-perturbed copies of the input.

use std::fmt;
use std::str::FromStr;

use neurarust_core::Tensor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::attribution::{Attribution, AttributionOutput, AttributionRequest};
use crate::common::{batch_size, repeat_interleave_rows};
use crate::error::AttributionError;
use crate::target::ExpansionType;

/// How the attributions of the noisy samples of one example are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NoiseTunnelType {
    /// Mean of the attributions.
    #[default]
    SmoothGrad,
    /// Mean of the squared attributions.
    SmoothGradSq,
    /// Variance of the attributions.
    VarGrad,
}

impl NoiseTunnelType {
    pub const ALL: [NoiseTunnelType; 3] = [
        NoiseTunnelType::SmoothGrad,
        NoiseTunnelType::SmoothGradSq,
        NoiseTunnelType::VarGrad,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NoiseTunnelType::SmoothGrad => "smoothgrad",
            NoiseTunnelType::SmoothGradSq => "smoothgrad_sq",
            NoiseTunnelType::VarGrad => "vargrad",
        }
    }

    /// Folds one example's samples into a single value.
    fn aggregate(&self, samples: impl Iterator<Item = f64>) -> f64 {
        let (mut count, mut sum, mut sum_sq) = (0usize, 0.0f64, 0.0f64);
        for v in samples {
            count += 1;
            sum += v;
            sum_sq += v * v;
        }
        if count == 0 {
            return 0.0;
        }
        let mean = sum / count as f64;
        let mean_sq = sum_sq / count as f64;
        match self {
            NoiseTunnelType::SmoothGrad => mean,
            NoiseTunnelType::SmoothGradSq => mean_sq,
            NoiseTunnelType::VarGrad => mean_sq - mean * mean,
        }
    }
}

impl fmt::Display for NoiseTunnelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoiseTunnelType {
    type Err = AttributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoiseTunnelType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AttributionError::UnknownTag {
                kind: "noise tunnel type",
                tag: s.to_string(),
            })
    }
}

/// Options of a noise tunnel call. `attribution` is forwarded to the wrapped method.
#[derive(Debug, Clone)]
pub struct NoiseTunnelRequest {
    pub nt_type: NoiseTunnelType,
    pub n_samples: usize,
    /// Standard deviation of the additive Gaussian noise.
    pub stdevs: f32,
    /// Give every noisy sample a baseline row drawn uniformly from `baselines`.
    pub draw_baseline_from_distrib: bool,
    pub attribution: AttributionRequest,
}

impl Default for NoiseTunnelRequest {
    fn default() -> Self {
        NoiseTunnelRequest {
            nt_type: NoiseTunnelType::SmoothGrad,
            n_samples: 5,
            stdevs: 1.0,
            draw_baseline_from_distrib: false,
            attribution: AttributionRequest::default(),
        }
    }
}

impl NoiseTunnelRequest {
    pub fn with_nt_type(mut self, nt_type: NoiseTunnelType) -> Self {
        self.nt_type = nt_type;
        self
    }

    pub fn with_n_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    pub fn with_stdevs(mut self, stdevs: f32) -> Self {
        self.stdevs = stdevs;
        self
    }

    pub fn with_draw_baseline_from_distrib(mut self, draw: bool) -> Self {
        self.draw_baseline_from_distrib = draw;
        self
    }

    pub fn with_attribution(mut self, attribution: AttributionRequest) -> Self {
        self.attribution = attribution;
        self
    }
}

/// Wraps an [`Attribution`] and smooths it over noisy input samples.
pub struct NoiseTunnel<A> {
    attribution: A,
    seed: Option<u64>,
}

impl<A: Attribution> NoiseTunnel<A> {
    pub fn new(attribution: A) -> Self {
        NoiseTunnel {
            attribution,
            seed: None,
        }
    }

    /// Makes the noise reproducible: every call draws from an RNG seeded with `seed`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn inner(&self) -> &A {
        &self.attribution
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Attributes `inputs` through `n_samples` noisy copies of every example.
    ///
    /// The returned delta, if requested, is the wrapped method's delta for every
    /// noisy sample (`batch * n_samples` values), not aggregated.
    pub fn attribute(
        &self,
        inputs: &Tensor,
        request: &NoiseTunnelRequest,
    ) -> Result<AttributionOutput, AttributionError> {
        let batch = batch_size(inputs)?;
        let n_samples = request.n_samples;
        if n_samples == 0 {
            return Err(AttributionError::InvalidSampleCount(n_samples));
        }
        if !request.stdevs.is_finite() || request.stdevs < 0.0 {
            return Err(AttributionError::InvalidStdev(request.stdevs));
        }
        if request.attribution.return_convergence_delta && !self.attribution.has_convergence_delta() {
            return Err(AttributionError::ConvergenceDeltaUnsupported {
                method: self.attribution.name(),
            });
        }

        let mut rng = self.rng();
        let noisy_inputs = self.add_noise(inputs, n_samples, request.stdevs, &mut rng)?;
        let baselines = self.expand_baselines(
            inputs,
            n_samples,
            request.attribution.baselines.as_ref(),
            request.draw_baseline_from_distrib,
            &mut rng,
        )?;
        let inner_request = AttributionRequest {
            baselines,
            target: request
                .attribution
                .target
                .expand(n_samples, ExpansionType::RepeatInterleave),
            ..request.attribution.clone()
        };
        log::debug!(
            "NoiseTunnel({}): {} x {} noisy samples, stdev {}",
            request.nt_type,
            batch,
            n_samples,
            request.stdevs
        );

        let output = self.attribution.attribute(&noisy_inputs, &inner_request)?;
        let attributions = aggregate_samples(&output.attributions, n_samples, request.nt_type)?;
        Ok(AttributionOutput {
            attributions,
            delta: output.delta,
        })
    }

    fn add_noise(
        &self,
        inputs: &Tensor,
        n_samples: usize,
        stdev: f32,
        rng: &mut StdRng,
    ) -> Result<Tensor, AttributionError> {
        let repeated = repeat_interleave_rows(inputs, n_samples)?;
        if stdev == 0.0 {
            return Ok(repeated);
        }
        let normal = Normal::new(0.0f32, stdev).map_err(|_| AttributionError::InvalidStdev(stdev))?;
        let noisy: Vec<f32> = repeated
            .get_f32_data()?
            .into_iter()
            .map(|x| x + normal.sample(rng))
            .collect();
        Ok(Tensor::new(noisy, repeated.shape())?)
    }

    /// Baselines matching the `batch * n_samples` noisy inputs.
    fn expand_baselines(
        &self,
        inputs: &Tensor,
        n_samples: usize,
        baselines: Option<&Tensor>,
        draw_from_distrib: bool,
        rng: &mut StdRng,
    ) -> Result<Option<Tensor>, AttributionError> {
        let Some(baselines) = baselines else {
            return Ok(None);
        };
        let batch = batch_size(inputs)?;
        let shape = baselines.shape();
        // Only baselines with a batch axis of their own carry rows to draw or follow.
        if shape.len() != inputs.rank() {
            return Ok(Some(baselines.clone()));
        }
        let rows = shape[0];

        if draw_from_distrib && rows > 0 {
            let data = baselines.get_f32_data()?;
            let row_len = data.len() / rows;
            let mut drawn = Vec::with_capacity(batch * n_samples * row_len);
            for _ in 0..batch * n_samples {
                let row = rng.gen_range(0..rows);
                drawn.extend_from_slice(&data[row * row_len..(row + 1) * row_len]);
            }
            let mut drawn_shape = shape;
            drawn_shape[0] = batch * n_samples;
            return Ok(Some(Tensor::new(drawn, drawn_shape)?));
        }

        // One baseline per example follows its example; broadcast baselines pass through.
        if rows == batch && batch > 1 {
            return Ok(Some(repeat_interleave_rows(baselines, n_samples)?));
        }
        Ok(Some(baselines.clone()))
    }
}

/// Folds consecutive groups of `n_samples` rows into one row each.
fn aggregate_samples(
    attributions: &Tensor,
    n_samples: usize,
    nt_type: NoiseTunnelType,
) -> Result<Tensor, AttributionError> {
    let mut shape = attributions.shape();
    let total_rows = batch_size(attributions)?;
    let data = attributions.get_f32_data()?;
    let row_len = data.len() / total_rows;
    let batch = total_rows / n_samples;

    let mut aggregated = Vec::with_capacity(batch * row_len);
    for group in data.chunks((row_len * n_samples).max(1)) {
        for j in 0..row_len {
            let samples = (0..n_samples).map(|s| group[s * row_len + j] as f64);
            aggregated.push(nt_type.aggregate(samples) as f32);
        }
    }
    shape[0] = batch;
    Ok(Tensor::new(aggregated, shape)?)
}

#[cfg(test)]
#[path = "noise_tunnel_test.rs"]
mod tests;
