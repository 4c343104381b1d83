use neurarust_core::Tensor;

use crate::approximation::ApproximationMethod;
use crate::error::AttributionError;
use crate::target::Target;

/// Options of a single attribution call.
#[derive(Debug, Clone)]
pub struct AttributionRequest {
    /// Reference input; all zeros when `None`.
    pub baselines: Option<Tensor>,
    pub target: Target,
    pub method: ApproximationMethod,
    pub n_steps: usize,
    /// Upper bound on the number of scaled examples evaluated per forward pass.
    pub internal_batch_size: Option<usize>,
    pub return_convergence_delta: bool,
}

impl Default for AttributionRequest {
    fn default() -> Self {
        AttributionRequest {
            baselines: None,
            target: Target::None,
            method: ApproximationMethod::GaussLegendre,
            n_steps: 50,
            internal_batch_size: None,
            return_convergence_delta: false,
        }
    }
}

impl AttributionRequest {
    pub fn with_baselines(mut self, baselines: Tensor) -> Self {
        self.baselines = Some(baselines);
        self
    }

    pub fn with_target(mut self, target: impl Into<Target>) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_method(mut self, method: ApproximationMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_n_steps(mut self, n_steps: usize) -> Self {
        self.n_steps = n_steps;
        self
    }

    pub fn with_internal_batch_size(mut self, internal_batch_size: usize) -> Self {
        self.internal_batch_size = Some(internal_batch_size);
        self
    }

    pub fn with_convergence_delta(mut self, return_convergence_delta: bool) -> Self {
        self.return_convergence_delta = return_convergence_delta;
        self
    }
}

/// Attributions with the input's shape, plus the convergence delta when requested.
#[derive(Debug, Clone)]
pub struct AttributionOutput {
    pub attributions: Tensor,
    pub delta: Option<Tensor>,
}

/// A gradient-based attribution method.
pub trait Attribution {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    fn attribute(
        &self,
        inputs: &Tensor,
        request: &AttributionRequest,
    ) -> Result<AttributionOutput, AttributionError>;

    /// Whether [`Attribution::compute_convergence_delta`] is supported.
    fn has_convergence_delta(&self) -> bool {
        false
    }

    /// Per-example completeness error of `attributions` computed between `start_point`
    /// and `end_point`.
    fn compute_convergence_delta(
        &self,
        _attributions: &Tensor,
        _start_point: Option<&Tensor>,
        _end_point: &Tensor,
        _target: &Target,
    ) -> Result<Tensor, AttributionError> {
        Err(AttributionError::ConvergenceDeltaUnsupported { method: self.name() })
    }
}
