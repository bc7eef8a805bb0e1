//! Learned parameters of a linear model and the linear scorer.

use crate::common_types::Scalar;
use crate::config::Initialization;
use crate::error::{LogisticError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `D` weights followed by one bias, stored contiguously.
///
/// The flat layout is what the optimizer updates in place; [`weights`](Self::weights)
/// and [`bias`](Self::bias) give the structured view.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParameterVector<F> {
    values: Vec<F>,
}

impl<F: Scalar> ParameterVector<F> {
    /// All-zero parameters for `n_features` features.
    pub fn zeros(n_features: usize) -> Self {
        ParameterVector {
            values: vec![F::zero(); n_features + 1],
        }
    }

    pub fn new(weights: Vec<F>, bias: F) -> Self {
        let mut values = weights;
        values.push(bias);
        ParameterVector { values }
    }

    /// Rebuilds parameters from the flat `[w_0, .., w_{D-1}, b]` layout.
    ///
    /// # Errors
    /// [`LogisticError::DimensionMismatch`] if `values` is empty (there must be a bias).
    pub fn from_flat(values: Vec<F>) -> Result<Self> {
        if values.is_empty() {
            return Err(LogisticError::DimensionMismatch { expected: 1, got: 0 });
        }
        Ok(ParameterVector { values })
    }

    /// Initial parameters for `n_features` features according to `init`.
    pub fn initialize(n_features: usize, init: &Initialization) -> Self {
        match *init {
            Initialization::Zeros => Self::zeros(n_features),
            Initialization::Random { seed, scale } => ParameterVector {
                values: random_values(n_features + 1, seed, scale),
            },
        }
    }

    /// Number of features `D` (the vector itself holds `D + 1` values).
    pub fn n_features(&self) -> usize {
        self.values.len() - 1
    }

    pub fn weights(&self) -> &[F] {
        &self.values[..self.values.len() - 1]
    }

    pub fn bias(&self) -> F {
        self.values[self.values.len() - 1]
    }

    pub fn as_slice(&self) -> &[F] {
        &self.values
    }

    pub fn into_inner(self) -> Vec<F> {
        self.values
    }

    /// Raw score `w · x + b` of a single sample.
    ///
    /// # Errors
    /// [`LogisticError::DimensionMismatch`] if `features.len() != self.n_features()`.
    pub fn score(&self, features: &[F]) -> Result<F> {
        score(features, self.weights(), self.bias())
    }
}

/// Weighted sum of `features` plus `bias`.
///
/// # Errors
/// [`LogisticError::DimensionMismatch`] if `features` and `weights` differ in length.
pub fn score<F: Scalar>(features: &[F], weights: &[F], bias: F) -> Result<F> {
    if features.len() != weights.len() {
        return Err(LogisticError::DimensionMismatch {
            expected: weights.len(),
            got: features.len(),
        });
    }
    Ok(dot(features, weights) + bias)
}

/// Calculates the dot product of two vectors of equal length.
pub(crate) fn dot<F: Scalar>(a: &[F], b: &[F]) -> F {
    a.iter().zip(b.iter()).map(|(&x, &y)| x * y).sum()
}

pub(crate) fn random_values<F: Scalar>(len: usize, seed: u64, scale: f64) -> Vec<F> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| F::lit(rng.gen_range(-scale..scale)))
        .collect()
}
