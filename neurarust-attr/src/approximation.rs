//! Quadrature rules for the path integral of integrated gradients.
//!
//! Every rule maps a step count `n` to `(step_sizes, alphas)`: the interpolation
//! coefficients `alphas` in `[0, 1]` and the weight each gradient sample gets in the
//! integral. Step sizes sum to 1 for every rule.

use std::fmt;
use std::str::FromStr;

use num_traits::Float;

use crate::error::AttributionError;

/// Numerical integration rule used along the baseline-to-input path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApproximationMethod {
    RiemannLeft,
    RiemannRight,
    RiemannMiddle,
    RiemannTrapezoid,
    #[default]
    GaussLegendre,
}

impl ApproximationMethod {
    pub const ALL: [ApproximationMethod; 5] = [
        ApproximationMethod::RiemannLeft,
        ApproximationMethod::RiemannRight,
        ApproximationMethod::RiemannMiddle,
        ApproximationMethod::RiemannTrapezoid,
        ApproximationMethod::GaussLegendre,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApproximationMethod::RiemannLeft => "riemann_left",
            ApproximationMethod::RiemannRight => "riemann_right",
            ApproximationMethod::RiemannMiddle => "riemann_middle",
            ApproximationMethod::RiemannTrapezoid => "riemann_trapezoid",
            ApproximationMethod::GaussLegendre => "gausslegendre",
        }
    }

    /// Smallest step count the rule is defined for.
    pub fn min_steps(&self) -> usize {
        match self {
            ApproximationMethod::RiemannTrapezoid => 2,
            _ => 1,
        }
    }

    /// Returns `(step_sizes, alphas)` for `n_steps` integration points.
    ///
    /// # Errors
    /// `InvalidStepCount` if `n_steps` is below [`ApproximationMethod::min_steps`].
    pub fn step_sizes_and_alphas(
        &self,
        n_steps: usize,
    ) -> Result<(Vec<f64>, Vec<f64>), AttributionError> {
        if n_steps < self.min_steps() {
            return Err(AttributionError::InvalidStepCount {
                method: *self,
                n_steps,
                minimum: self.min_steps(),
            });
        }
        let n = n_steps as f64;
        let result = match self {
            ApproximationMethod::RiemannLeft => riemann(n_steps, |k| k as f64 / n),
            ApproximationMethod::RiemannRight => riemann(n_steps, |k| (k + 1) as f64 / n),
            ApproximationMethod::RiemannMiddle => riemann(n_steps, |k| (k as f64 + 0.5) / n),
            ApproximationMethod::RiemannTrapezoid => {
                let interval = 1.0 / (n - 1.0);
                let mut step_sizes = vec![interval; n_steps];
                step_sizes[0] = interval / 2.0;
                step_sizes[n_steps - 1] = interval / 2.0;
                let alphas = (0..n_steps).map(|k| k as f64 * interval).collect();
                (step_sizes, alphas)
            }
            ApproximationMethod::GaussLegendre => {
                let (nodes, weights) = gauss_legendre::<f64>(n_steps);
                let step_sizes = weights.iter().map(|w| w / 2.0).collect();
                let alphas = nodes.iter().map(|x| (1.0 + x) / 2.0).collect();
                (step_sizes, alphas)
            }
        };
        Ok(result)
    }
}

fn riemann<F: Fn(usize) -> f64>(n_steps: usize, alpha: F) -> (Vec<f64>, Vec<f64>) {
    let step_sizes = vec![1.0 / n_steps as f64; n_steps];
    let alphas = (0..n_steps).map(alpha).collect();
    (step_sizes, alphas)
}

/// Nodes and weights of the `n`-point Gauss-Legendre rule on `[-1, 1]`, nodes ascending.
///
/// Each root of `P_n` is refined by Newton iteration from the Chebyshev-like guess
/// `cos(pi (i + 3/4) / (n + 1/2))`, evaluating `P_n` with the three-term recurrence.
pub fn gauss_legendre<T: Float>(n: usize) -> (Vec<T>, Vec<T>) {
    let mut nodes = vec![T::zero(); n];
    let mut weights = vec![T::zero(); n];
    if n == 0 {
        return (nodes, weights);
    }
    let one = T::one();
    let two = one + one;
    let n_t = T::from(n).unwrap_or_else(T::zero);
    let pi = T::from(std::f64::consts::PI).unwrap_or_else(T::zero);
    let eps = T::epsilon() * T::from(4.0).unwrap_or(one);
    let half = (n + 1) / 2;

    for i in 0..half {
        let i_t = T::from(i).unwrap_or_else(T::zero);
        let quarter = T::from(0.75).unwrap_or_else(T::zero);
        let mut z = (pi * (i_t + quarter) / (n_t + one / two)).cos();
        for _ in 0..100 {
            let (p_n, dp_n) = legendre_with_derivative(n, z);
            let z_prev = z;
            z = z_prev - p_n / dp_n;
            if (z - z_prev).abs() <= eps {
                break;
            }
        }
        let (_, derivative) = legendre_with_derivative(n, z);
        let weight = two / ((one - z * z) * derivative * derivative);
        // Roots come in +/- pairs; the loop produces them in descending order of z.
        nodes[i] = -z;
        nodes[n - 1 - i] = z;
        weights[i] = weight;
        weights[n - 1 - i] = weight;
    }
    (nodes, weights)
}

/// Evaluates `P_n(z)` and `P_n'(z)`.
fn legendre_with_derivative<T: Float>(n: usize, z: T) -> (T, T) {
    let one = T::one();
    let mut p_prev = T::zero();
    let mut p = one;
    for j in 0..n {
        let j_t = T::from(j).unwrap_or_else(T::zero);
        let p_next = ((j_t + j_t + one) * z * p - j_t * p_prev) / (j_t + one);
        p_prev = p;
        p = p_next;
    }
    let n_t = T::from(n).unwrap_or_else(T::zero);
    let dp = n_t * (z * p - p_prev) / (z * z - one);
    (p, dp)
}

impl fmt::Display for ApproximationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApproximationMethod {
    type Err = AttributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApproximationMethod::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| AttributionError::UnknownTag {
                kind: "approximation method",
                tag: s.to_string(),
            })
    }
}

#[cfg(test)]
#[path = "approximation_test.rs"]
mod tests;
