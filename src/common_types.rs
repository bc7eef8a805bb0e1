//! This module contains the data structures shared by every classifier in the crate.

use crate::error::{LogisticError, Result};
use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;
use std::iter::Sum;

/// Floating point type the engine is generic over.
///
/// Implemented for `f32` and `f64`. Besides the `num_traits::Float` arithmetic it
/// provides lossless-enough conversions to and from `f64`, which is the type
/// hyperparameters and metrics are expressed in.
pub trait Scalar: Float + FromPrimitive + Sum + Debug + Default + Send + Sync + 'static {
    /// Smallest probability the engine will produce or take a logarithm of.
    fn prob_epsilon() -> Self;

    /// Converts an `f64` literal or hyperparameter into `Self`.
    fn lit(value: f64) -> Self;

    /// Widens `self` to `f64`.
    fn as_f64(self) -> f64;
}

impl Scalar for f64 {
    fn prob_epsilon() -> Self {
        1e-15
    }

    fn lit(value: f64) -> Self {
        value
    }

    fn as_f64(self) -> f64 {
        self
    }
}

impl Scalar for f32 {
    // 1e-15 is below f32 resolution around 1.0, `1 - eps` would round back to 1.
    fn prob_epsilon() -> Self {
        1e-7
    }

    fn lit(value: f64) -> Self {
        value as f32
    }

    fn as_f64(self) -> f64 {
        self as f64
    }
}

/// Represents a single data point, with features and a label.
///
/// - `F`: The type of the features (e.g., `f64`, `f32`).
/// - `L`: The type of the label. The classifiers in this crate use `usize` class ids.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint<F, L> {
    pub features: Vec<F>,
    pub label: L,
}

impl<F, L> DataPoint<F, L> {
    pub fn new(features: Vec<F>, label: L) -> Self {
        DataPoint { features, label }
    }
}

/// Dense, row-major `N x D` matrix of samples.
///
/// Every row has the same number of features. The matrix is immutable once built,
/// so classifiers can share it freely (including across threads) while training.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix<F> {
    data: Vec<F>,
    n_samples: usize,
    n_features: usize,
}

impl<F: Scalar> FeatureMatrix<F> {
    /// Builds a matrix from a flat row-major buffer.
    ///
    /// # Errors
    /// [`LogisticError::DimensionMismatch`] if `data.len() != n_samples * n_features`.
    pub fn from_flat(data: Vec<F>, n_samples: usize, n_features: usize) -> Result<Self> {
        if data.len() != n_samples * n_features {
            return Err(LogisticError::DimensionMismatch {
                expected: n_samples * n_features,
                got: data.len(),
            });
        }
        Ok(FeatureMatrix {
            data,
            n_samples,
            n_features,
        })
    }

    /// Builds a matrix from a list of rows.
    ///
    /// The dimension `D` is taken from the first row; an empty list yields an empty
    /// `0 x 0` matrix.
    ///
    /// # Errors
    /// [`LogisticError::DimensionMismatch`] if any row differs in length from the first.
    pub fn from_rows(rows: Vec<Vec<F>>) -> Result<Self> {
        let n_features = rows.first().map_or(0, Vec::len);
        let n_samples = rows.len();
        let mut data = Vec::with_capacity(n_samples * n_features);

        for row in rows {
            if row.len() != n_features {
                return Err(LogisticError::DimensionMismatch {
                    expected: n_features,
                    got: row.len(),
                });
            }
            data.extend(row);
        }

        Ok(FeatureMatrix {
            data,
            n_samples,
            n_features,
        })
    }

    /// Splits labelled records into a feature matrix and the matching label vector.
    pub fn from_data_points(points: &[DataPoint<F, usize>]) -> Result<(Self, Vec<usize>)> {
        let labels = points.iter().map(|dp| dp.label).collect();
        let matrix = Self::from_rows(points.iter().map(|dp| dp.features.clone()).collect())?;
        Ok((matrix, labels))
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn is_empty(&self) -> bool {
        self.n_samples == 0
    }

    /// Returns the `i`-th sample.
    ///
    /// # Panics
    /// Panics if `i >= n_samples()`.
    pub fn row(&self, i: usize) -> &[F] {
        let start = i * self.n_features;
        &self.data[start..start + self.n_features]
    }

    /// Iterates over the samples in order.
    pub fn rows(&self) -> impl Iterator<Item = &[F]> + '_ {
        (0..self.n_samples).map(move |i| self.row(i))
    }
}

/// Checks that a label vector is parallel to the matrix and that every label is below `n_classes`.
pub(crate) fn validate_labels<F: Scalar>(
    x: &FeatureMatrix<F>,
    y: &[usize],
    n_classes: usize,
) -> Result<()> {
    if x.is_empty() {
        return Err(LogisticError::EmptyDataset);
    }
    if x.n_samples() != y.len() {
        return Err(LogisticError::LengthMismatch {
            expected: x.n_samples(),
            got: y.len(),
        });
    }
    if let Some(&label) = y.iter().find(|&&label| label >= n_classes) {
        return Err(LogisticError::LabelDomain { label, n_classes });
    }
    Ok(())
}
