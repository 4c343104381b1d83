//! Selection of the scalar output each example is attributed to.

use neurarust_core::Tensor;

use crate::error::AttributionError;

/// Which output coordinate attributions are computed for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Target {
    /// The model has a single output per example.
    #[default]
    None,
    /// The same class for every example.
    Index(usize),
    /// One class per example.
    PerExample(Vec<usize>),
}

/// How a per-example target follows inputs that were replicated `n` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionType {
    /// `[a, b]` becomes `[a, b, a, b, ...]` (whole batch repeated).
    Repeat,
    /// `[a, b]` becomes `[a, a, ..., b, b, ...]` (each example repeated in place).
    RepeatInterleave,
}

impl Target {
    /// Expands the target for inputs replicated `n` times with `expansion`.
    pub fn expand(&self, n: usize, expansion: ExpansionType) -> Target {
        match self {
            Target::PerExample(indices) => {
                let expanded = match expansion {
                    ExpansionType::Repeat => indices.repeat(n),
                    ExpansionType::RepeatInterleave => indices
                        .iter()
                        .flat_map(|&i| std::iter::repeat(i).take(n))
                        .collect(),
                };
                Target::PerExample(expanded)
            }
            other => other.clone(),
        }
    }
}

impl From<usize> for Target {
    fn from(index: usize) -> Self {
        Target::Index(index)
    }
}

impl From<Vec<usize>> for Target {
    fn from(indices: Vec<usize>) -> Self {
        Target::PerExample(indices)
    }
}

/// Picks the targeted output of every example, giving a `(batch,)` tensor.
///
/// Differentiable: gradients flow back to `output`.
///
/// # Errors
/// - `TargetRequired` if `target` is `None` but the output has several columns.
/// - `TargetOutOfRange` / `TargetLengthMismatch` for invalid class indices.
/// - `UnsupportedOutputShape` for outputs that are neither `(batch,)` nor `(batch, classes)`.
pub fn select_targets(output: &Tensor, target: &Target) -> Result<Tensor, AttributionError> {
    let shape = output.shape();
    match target {
        Target::None => match shape.as_slice() {
            [_] => Ok(output.clone()),
            // Drops the size-1 column while keeping the graph.
            [_, 1] => Ok(output.sum_axes(&[1], false)?),
            [_, _] => Err(AttributionError::TargetRequired {
                output_shape: shape,
            }),
            _ => Err(AttributionError::UnsupportedOutputShape {
                output_shape: shape,
            }),
        },
        Target::Index(index) => {
            let (batch, classes) = batch_and_classes(&shape)?;
            check_index(*index, classes)?;
            Ok(output.gather(&vec![*index; batch])?)
        }
        Target::PerExample(indices) => {
            let (batch, classes) = batch_and_classes(&shape)?;
            if indices.len() != batch {
                return Err(AttributionError::TargetLengthMismatch {
                    expected: batch,
                    actual: indices.len(),
                });
            }
            for &index in indices {
                check_index(index, classes)?;
            }
            Ok(output.gather(indices)?)
        }
    }
}

fn batch_and_classes(shape: &[usize]) -> Result<(usize, usize), AttributionError> {
    match shape {
        [batch, classes] => Ok((*batch, *classes)),
        _ => Err(AttributionError::UnsupportedOutputShape {
            output_shape: shape.to_vec(),
        }),
    }
}

fn check_index(index: usize, num_classes: usize) -> Result<(), AttributionError> {
    if index >= num_classes {
        return Err(AttributionError::TargetOutOfRange { index, num_classes });
    }
    Ok(())
}

#[cfg(test)]
#[path = "target_test.rs"]
mod tests;
