use neurarust_core::NeuraRustError;
use thiserror::Error;

use crate::approximation::ApproximationMethod;

/// Errors raised while computing attributions.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum AttributionError {
    #[error(transparent)]
    Tensor(#[from] NeuraRustError),

    #[error("{method} needs at least {minimum} steps, got {n_steps}")]
    InvalidStepCount {
        method: ApproximationMethod,
        n_steps: usize,
        minimum: usize,
    },

    #[error("Unknown {kind} '{tag}'")]
    UnknownTag { kind: &'static str, tag: String },

    #[error("A target is required for model output of shape {output_shape:?}")]
    TargetRequired { output_shape: Vec<usize> },

    #[error("Target index {index} out of range for {num_classes} output classes")]
    TargetOutOfRange { index: usize, num_classes: usize },

    #[error("Expected {expected} per-example targets, got {actual}")]
    TargetLengthMismatch { expected: usize, actual: usize },

    #[error("Cannot select targets from model output of shape {output_shape:?}")]
    UnsupportedOutputShape { output_shape: Vec<usize> },

    #[error("Baseline of shape {baseline:?} does not fit input of shape {input:?}")]
    BaselineShapeMismatch {
        input: Vec<usize>,
        baseline: Vec<usize>,
    },

    #[error("Attributions of shape {actual:?} do not match inputs of shape {expected:?}")]
    AttributionShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("n_samples must be at least 1, got {0}")]
    InvalidSampleCount(usize),

    #[error("Noise standard deviation must be finite and non-negative, got {0}")]
    InvalidStdev(f32),

    #[error("{method} does not provide a convergence delta")]
    ConvergenceDeltaUnsupported { method: &'static str },

    #[error("Inputs must have a non-empty batch dimension, got shape {shape:?}")]
    EmptyBatch { shape: Vec<usize> },
}

/// A failed completeness check.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum VerificationError {
    #[error(transparent)]
    Attribution(#[from] AttributionError),

    #[error("The attribution call returned no convergence delta")]
    MissingDelta,

    #[error("Returned delta {inline:?} differs from recomputed delta {recomputed:?}")]
    DeltaMismatch {
        inline: Vec<f32>,
        recomputed: Vec<f32>,
    },

    #[error("Convergence delta exceeds {threshold}: {deltas:?}")]
    DeltaAboveThreshold { threshold: f32, deltas: Vec<f32> },

    #[error("Convergence delta has shape {actual:?}, expected {expected:?}")]
    DeltaShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Attributions have shape {actual:?}, inputs have shape {expected:?}")]
    AttributionShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
}

impl From<NeuraRustError> for VerificationError {
    fn from(err: NeuraRustError) -> Self {
        VerificationError::Attribution(AttributionError::Tensor(err))
    }
}
