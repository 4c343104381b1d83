//! Completeness checks: attributions must add up to the change of the targeted output
//! between baseline and input.

use std::fmt;
use std::str::FromStr;

use neurarust_core::nn::Module;
use neurarust_core::Tensor;

use crate::approximation::ApproximationMethod;
use crate::attribution::{Attribution, AttributionOutput, AttributionRequest};
use crate::common::{batch_size, tensors_almost_equal, ToleranceMode};
use crate::error::{AttributionError, VerificationError};
use crate::integrated_gradients::IntegratedGradients;
use crate::noise_tunnel::{NoiseTunnel, NoiseTunnelRequest, NoiseTunnelType};
use crate::target::Target;

/// Plain integrated gradients, or integrated gradients under a noise tunnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributionMode {
    Vanilla,
    NoiseTunnel(NoiseTunnelType),
}

impl AttributionMode {
    pub const ALL: [AttributionMode; 4] = [
        AttributionMode::Vanilla,
        AttributionMode::NoiseTunnel(NoiseTunnelType::SmoothGrad),
        AttributionMode::NoiseTunnel(NoiseTunnelType::SmoothGradSq),
        AttributionMode::NoiseTunnel(NoiseTunnelType::VarGrad),
    ];
}

impl fmt::Display for AttributionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributionMode::Vanilla => f.write_str("vanilla"),
            AttributionMode::NoiseTunnel(nt_type) => write!(f, "{}", nt_type),
        }
    }
}

impl FromStr for AttributionMode {
    type Err = AttributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "vanilla" {
            return Ok(AttributionMode::Vanilla);
        }
        s.parse::<NoiseTunnelType>()
            .map(AttributionMode::NoiseTunnel)
            .map_err(|_| AttributionError::UnknownTag {
                kind: "attribution mode",
                tag: s.to_string(),
            })
    }
}

/// Delta bounds applied by [`CompletenessVerifier`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Bound on every `|delta|` of a vanilla run.
    pub tight: f32,
    /// Bound on every `|delta|` in all modes.
    pub loose: f32,
    /// Allowed sum of absolute differences between returned and recomputed deltas.
    pub delta_match: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            tight: 0.005,
            loose: 0.05,
            delta_match: 1e-4,
        }
    }
}

/// Attribution settings used by [`CompletenessVerifier`].
#[derive(Debug, Clone, PartialEq)]
pub struct VerifierConfig {
    pub vanilla_n_steps: usize,
    pub noise_n_samples: usize,
    pub noise_stdevs: f32,
    pub noise_n_steps: usize,
    pub thresholds: Thresholds,
    /// Seed of the noise tunnel RNG; fresh entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        VerifierConfig {
            vanilla_n_steps: 200,
            noise_n_samples: 10,
            noise_stdevs: 0.0002,
            noise_n_steps: 100,
            thresholds: Thresholds::default(),
            seed: None,
        }
    }
}

impl VerifierConfig {
    pub fn with_vanilla_n_steps(mut self, n_steps: usize) -> Self {
        self.vanilla_n_steps = n_steps;
        self
    }

    pub fn with_noise_n_samples(mut self, n_samples: usize) -> Self {
        self.noise_n_samples = n_samples;
        self
    }

    pub fn with_noise_stdevs(mut self, stdevs: f32) -> Self {
        self.noise_stdevs = stdevs;
        self
    }

    pub fn with_noise_n_steps(mut self, n_steps: usize) -> Self {
        self.noise_n_steps = n_steps;
        self
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Outcome of a passed verification.
#[derive(Debug, Clone)]
pub struct VerificationReport {
    pub mode: AttributionMode,
    pub method: ApproximationMethod,
    pub attributions: Tensor,
    pub delta: Tensor,
    pub max_abs_delta: f32,
}

/// Runs an attribution and checks its completeness.
#[derive(Debug, Clone, Default)]
pub struct CompletenessVerifier {
    config: VerifierConfig,
}

impl CompletenessVerifier {
    pub fn new(config: VerifierConfig) -> Self {
        CompletenessVerifier { config }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Attributes `input` for `target` on `model` in `mode` with `method`, then checks:
    ///
    /// - vanilla: the returned delta matches an independent recomputation, every
    ///   `|delta|` is below the tight bound and there is one delta per example;
    /// - noise tunnel: there is one delta per noisy sample;
    /// - always: every `|delta|` is below the loose bound and the attributions have
    ///   the input's shape.
    ///
    /// Parameter gradients of `model` are cleared first.
    pub fn verify<M: Module + ?Sized>(
        &self,
        model: &M,
        input: &Tensor,
        target: &Target,
        baseline: Option<&Tensor>,
        mode: AttributionMode,
        method: ApproximationMethod,
    ) -> Result<VerificationReport, VerificationError> {
        model.zero_grad();
        let ig = IntegratedGradients::new(|x: &Tensor| model.forward(x));
        let batch = batch_size(input)?;
        let thresholds = &self.config.thresholds;

        let mut request = AttributionRequest::default()
            .with_target(target.clone())
            .with_method(method)
            .with_convergence_delta(true);
        if let Some(b) = baseline {
            request = request.with_baselines(b.clone());
        }

        let (output, delta) = match mode {
            AttributionMode::Vanilla => {
                let request = request.with_n_steps(self.config.vanilla_n_steps);
                let output = ig.attribute(input, &request)?;
                let delta = output.delta.clone().ok_or(VerificationError::MissingDelta)?;

                let recomputed =
                    ig.compute_convergence_delta(&output.attributions, baseline, input, target)?;
                check_delta_match(&delta, &recomputed, thresholds.delta_match)?;
                check_deltas_below(&delta, thresholds.tight)?;
                check_delta_len(&delta, batch)?;
                (output, delta)
            }
            AttributionMode::NoiseTunnel(nt_type) => {
                let mut nt = NoiseTunnel::new(ig);
                if let Some(seed) = self.config.seed {
                    nt = nt.with_seed(seed);
                }
                let nt_request = NoiseTunnelRequest::default()
                    .with_nt_type(nt_type)
                    .with_n_samples(self.config.noise_n_samples)
                    .with_stdevs(self.config.noise_stdevs)
                    .with_attribution(request.with_n_steps(self.config.noise_n_steps));
                let output = nt.attribute(input, &nt_request)?;
                let delta = output.delta.clone().ok_or(VerificationError::MissingDelta)?;
                check_delta_len(&delta, batch * self.config.noise_n_samples)?;
                (output, delta)
            }
        };

        check_deltas_below(&delta, thresholds.loose)?;
        check_attribution_shape(&output, input)?;

        let max_abs_delta = delta
            .get_f32_data()?
            .iter()
            .fold(0.0f32, |acc, d| acc.max(d.abs()));
        log::info!(
            "{} / {}: completeness holds, max |delta| = {:.3e}",
            mode,
            method,
            max_abs_delta
        );
        Ok(VerificationReport {
            mode,
            method,
            attributions: output.attributions,
            delta,
            max_abs_delta,
        })
    }
}

fn check_deltas_below(delta: &Tensor, threshold: f32) -> Result<(), VerificationError> {
    let deltas = delta.get_f32_data()?;
    // Written so that NaN fails the check.
    if deltas.iter().all(|d| d.abs() < threshold) {
        return Ok(());
    }
    log::warn!("convergence delta above {}: {:?}", threshold, deltas);
    Err(VerificationError::DeltaAboveThreshold { threshold, deltas })
}

fn check_delta_match(inline: &Tensor, recomputed: &Tensor, tolerance: f32) -> Result<(), VerificationError> {
    if tensors_almost_equal(inline, recomputed, tolerance, ToleranceMode::Sum)? {
        return Ok(());
    }
    Err(VerificationError::DeltaMismatch {
        inline: inline.get_f32_data()?,
        recomputed: recomputed.get_f32_data()?,
    })
}

/// The delta must be one-dimensional with `expected` entries.
fn check_delta_len(delta: &Tensor, expected: usize) -> Result<(), VerificationError> {
    let actual = delta.shape();
    if actual != [expected] {
        return Err(VerificationError::DeltaShapeMismatch {
            expected: vec![expected],
            actual,
        });
    }
    Ok(())
}

fn check_attribution_shape(output: &AttributionOutput, input: &Tensor) -> Result<(), VerificationError> {
    let expected = input.shape();
    let actual = output.attributions.shape();
    if actual != expected {
        return Err(VerificationError::AttributionShapeMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
#[path = "verifier_test.rs"]
mod tests;
