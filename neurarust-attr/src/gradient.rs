use neurarust_core::{autograd, NeuraRustError, Tensor};

use crate::error::AttributionError;
use crate::target::{select_targets, Target};

/// Gradient of the targeted outputs of `forward` with respect to `inputs`.
///
/// The targeted outputs are summed, so row `i` of the result is the gradient of
/// example `i`'s own target. `inputs` is copied into a fresh graph leaf and the
/// gradient is returned directly; no `.grad` field (of the inputs or of any model
/// parameter) is written.
pub fn compute_gradients<F>(
    forward: &F,
    inputs: &Tensor,
    target: &Target,
) -> Result<Tensor, AttributionError>
where
    F: Fn(&Tensor) -> Result<Tensor, NeuraRustError>,
{
    let leaf = inputs.detach();
    leaf.requires_grad_(true)?;
    let output = forward(&leaf)?;
    let selected = select_targets(&output, target)?;
    let total = selected.sum_all()?;
    let mut grads = autograd::grad(&total, &[leaf], None)?;
    grads.pop().ok_or_else(|| {
        NeuraRustError::InternalError("autograd::grad returned no gradient".to_string()).into()
    })
}
