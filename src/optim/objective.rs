//! Differentiable training objectives.
//!
//! An [`Objective`] binds a loss function to one dataset and evaluates the loss
//! together with its gradient for a flat parameter slice. The optimizer only sees
//! this trait, so binary and multinomial models share the same training loop.

use crate::common_types::{FeatureMatrix, Scalar};
use crate::linear::{clamp_probability, sigmoid};
use crate::linear::parameters::dot;

/// A loss that can be evaluated with its gradient.
pub trait Objective<F: Scalar> {
    /// Number of parameters the objective expects.
    fn n_params(&self) -> usize;

    /// Returns `(loss, gradient)` at `params`. The gradient has `n_params()` entries.
    fn loss_and_gradient(&self, params: &[F]) -> (F, Vec<F>);
}

/// Mean binary cross-entropy of a linear-logistic model, with optional L2 penalty.
///
/// Parameters use the `[w_0, .., w_{D-1}, b]` layout of
/// [`ParameterVector`](crate::linear::ParameterVector). Labels are `0` or `1`.
pub struct BinaryCrossEntropy<'a, F> {
    x: &'a FeatureMatrix<F>,
    y: &'a [usize],
    l2_penalty: Option<F>,
}

impl<'a, F: Scalar> BinaryCrossEntropy<'a, F> {
    /// Binds the objective to `x` and `y`.
    ///
    /// Callers are expected to have validated the data: `y.len() == x.n_samples()`,
    /// labels in `{0, 1}`, at least one sample.
    pub fn new(x: &'a FeatureMatrix<F>, y: &'a [usize], l2_penalty: Option<F>) -> Self {
        BinaryCrossEntropy { x, y, l2_penalty }
    }
}

impl<F: Scalar> Objective<F> for BinaryCrossEntropy<'_, F> {
    fn n_params(&self) -> usize {
        self.x.n_features() + 1
    }

    fn loss_and_gradient(&self, params: &[F]) -> (F, Vec<F>) {
        binary_cross_entropy(self.x, self.y, params, self.l2_penalty)
    }
}

/// Loss and gradient of mean binary cross-entropy.
///
/// ```text
/// loss   = -(1/N) Σ [y ln p + (1 - y) ln(1 - p)] + (λ/2) ‖w‖²
/// ∂/∂w   =  (1/N) Σ (p - y) x + λ w
/// ∂/∂b   =  (1/N) Σ (p - y)
/// ```
///
/// `p` is clamped into `[eps, 1 - eps]` before taking logarithms. The loss of an
/// empty dataset is `0` with a zero gradient.
pub fn binary_cross_entropy<F: Scalar>(
    x: &FeatureMatrix<F>,
    y: &[usize],
    params: &[F],
    l2_penalty: Option<F>,
) -> (F, Vec<F>) {
    debug_assert_eq!(params.len(), x.n_features() + 1);
    debug_assert_eq!(y.len(), x.n_samples());

    let n_features = x.n_features();
    let (weights, bias) = params.split_at(n_features);
    let bias = bias[0];
    let mut grad = vec![F::zero(); n_features + 1];
    let mut loss = F::zero();

    for (row, &label) in x.rows().zip(y) {
        let p = clamp_probability(sigmoid(dot(row, weights) + bias));
        let target = if label == 1 { F::one() } else { F::zero() };

        loss = loss - (target * p.ln() + (F::one() - target) * (F::one() - p).ln());

        let residual = p - target;
        for (g, &xi) in grad.iter_mut().zip(row) {
            *g = *g + residual * xi;
        }
        grad[n_features] = grad[n_features] + residual;
    }

    if x.n_samples() > 0 {
        let n = F::lit(x.n_samples() as f64);
        loss = loss / n;
        for g in grad.iter_mut() {
            *g = *g / n;
        }
    }

    if let Some(lambda) = l2_penalty {
        loss = loss + lambda * F::lit(0.5) * dot(weights, weights);
        for (g, &w) in grad.iter_mut().zip(weights) {
            *g = *g + lambda * w;
        }
    }

    (loss, grad)
}
