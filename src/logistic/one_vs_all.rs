//! One-vs-all (one-vs-rest) multi-class composition of binary classifiers.

use log::{debug, info};
use rayon::prelude::*;

use super::BinaryClassifier;
use crate::common_types::{validate_labels, FeatureMatrix, Scalar};
use crate::config::TrainingConfig;
use crate::error::{LogisticError, Result};

/// Multi-class classifier made of `K` independent binary classifiers.
///
/// Member `k` is trained with class `k` as the positive label and every other class
/// as negative. Members live in a `Vec` indexed by class id and each owns its
/// parameters, so training them concurrently needs no synchronization: they only
/// read the shared feature matrix.
#[derive(Debug, Clone)]
pub struct OneVsAllClassifier<F: Scalar> {
    n_classes: usize,
    config: TrainingConfig,
    estimators: Vec<BinaryClassifier<F>>,
}

impl<F: Scalar> OneVsAllClassifier<F> {
    /// # Errors
    /// [`LogisticError::InvalidConfig`] if `n_classes < 2`.
    pub fn new(n_classes: usize, config: TrainingConfig) -> Result<Self> {
        if n_classes < 2 {
            return Err(LogisticError::InvalidConfig {
                name: "n_classes",
                value: n_classes.to_string(),
            });
        }
        Ok(OneVsAllClassifier {
            n_classes,
            config,
            estimators: Vec::new(),
        })
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Trained members indexed by class id; empty before `fit`.
    pub fn estimators(&self) -> &[BinaryClassifier<F>] {
        &self.estimators
    }

    pub fn is_fitted(&self) -> bool {
        self.estimators.len() == self.n_classes
    }

    /// Trains one binary classifier per class.
    ///
    /// Runs on the rayon thread pool when `config.parallel` is set; the result is the
    /// same either way since the members share nothing mutable.
    ///
    /// # Errors
    /// - [`LogisticError::EmptyDataset`] if `x` has no samples.
    /// - [`LogisticError::LengthMismatch`] if `y.len() != x.n_samples()`.
    /// - [`LogisticError::LabelDomain`] if a label is not in `[0, K)`.
    /// - [`LogisticError::InvalidConfig`] if the configuration does not validate.
    pub fn fit(&mut self, x: &FeatureMatrix<F>, y: &[usize]) -> Result<()> {
        self.config.validate()?;
        validate_labels(x, y, self.n_classes)?;

        let fit_class = |class: usize| -> Result<BinaryClassifier<F>> {
            let binary_labels: Vec<usize> =
                y.iter().map(|&label| usize::from(label == class)).collect();
            let mut member = BinaryClassifier::new(self.config.clone());
            member.fit(x, &binary_labels)?;
            debug!("one-vs-all member {class} trained");
            Ok(member)
        };

        let estimators = if self.config.parallel {
            (0..self.n_classes)
                .into_par_iter()
                .map(fit_class)
                .collect::<Result<Vec<_>>>()?
        } else {
            (0..self.n_classes)
                .map(fit_class)
                .collect::<Result<Vec<_>>>()?
        };

        info!(
            "one-vs-all fit: classes={} samples={} parallel={}",
            self.n_classes,
            x.n_samples(),
            self.config.parallel
        );
        self.estimators = estimators;
        Ok(())
    }

    /// Probability of each class according to its own member, indexed by class id.
    ///
    /// The values come from independent models and are not normalised to sum to 1.
    pub fn predict_proba(&self, features: &[F]) -> Result<Vec<F>> {
        if !self.is_fitted() {
            return Err(LogisticError::NotFitted);
        }
        self.estimators.iter().map(|member| member.predict_proba(features)).collect()
    }

    /// The class whose member reports the highest probability.
    ///
    /// Ties go to the lowest class index.
    pub fn predict(&self, features: &[F]) -> Result<usize> {
        let probabilities = self.predict_proba(features)?;
        Ok(argmax(&probabilities))
    }

    /// Predicted classes for every row of `x`.
    pub fn predict_batch(&self, x: &FeatureMatrix<F>) -> Result<Vec<usize>> {
        x.rows().map(|row| self.predict(row)).collect()
    }

    /// Fraction of rows of `x` whose predicted class equals `y`.
    pub fn score(&self, x: &FeatureMatrix<F>, y: &[usize]) -> Result<f64> {
        let predictions = self.predict_batch(x)?;
        crate::metrics::accuracy(y, &predictions)
    }
}

/// Index of the largest value; the first one wins ties. NaN values never win.
pub(crate) fn argmax<F: Scalar>(values: &[F]) -> usize {
    let mut best = 0;
    for (k, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] || values[best].is_nan() {
            best = k;
        }
    }
    best
}
