//! Integrated-gradients attribution for NeuraRust models, with a noise tunnel and a
//! completeness verifier.
//!
//! ```no_run
//! use neurarust_attr::{ApproximationMethod, Attribution, AttributionRequest, IntegratedGradients};
//! use neurarust_core::nn::{Linear, Module};
//! use neurarust_core::Tensor;
//!
//! # fn main() -> Result<(), neurarust_attr::AttributionError> {
//! let model = Linear::new(4, 1, true)?;
//! let ig = IntegratedGradients::new(|x: &Tensor| model.forward(x));
//! let input = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], vec![1, 4])?;
//! let request = AttributionRequest::default()
//!     .with_method(ApproximationMethod::RiemannTrapezoid)
//!     .with_convergence_delta(true);
//! let output = ig.attribute(&input, &request)?;
//! println!("{:?} {:?}", output.attributions, output.delta);
//! # Ok(())
//! # }
//! ```

pub mod approximation;
pub mod attribution;
pub mod common;
pub mod error;
pub mod gradient;
pub mod integrated_gradients;
pub mod noise_tunnel;
pub mod target;
pub mod verifier;

pub use approximation::ApproximationMethod;
pub use attribution::{Attribution, AttributionOutput, AttributionRequest};
pub use common::{tensors_almost_equal, ToleranceMode};
pub use error::{AttributionError, VerificationError};
pub use integrated_gradients::IntegratedGradients;
pub use noise_tunnel::{NoiseTunnel, NoiseTunnelRequest, NoiseTunnelType};
pub use target::{ExpansionType, Target};
pub use verifier::{AttributionMode, CompletenessVerifier, Thresholds, VerificationReport, VerifierConfig};
