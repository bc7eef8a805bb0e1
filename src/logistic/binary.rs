//! Two-class logistic regression.

use log::info;

use super::TrainingReport;
use crate::common_types::{validate_labels, FeatureMatrix, Scalar};
use crate::config::TrainingConfig;
use crate::error::{LogisticError, Result};
use crate::linear::{sigmoid, ParameterVector};
use crate::optim::{BinaryCrossEntropy, GradientDescent};

/// Probability threshold used by [`BinaryClassifier::predict_default`].
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Binary logistic regression classifier.
///
/// Models `P(y = 1 | x) = sigmoid(w · x + b)` and learns `(w, b)` by batch gradient
/// descent on the mean binary cross-entropy. Labels are `0` or `1`.
///
/// ```
/// use logistic_regression::{BinaryClassifier, FeatureMatrix, TrainingConfig};
///
/// let x = FeatureMatrix::from_rows(vec![
///     vec![-2.0, -1.0],
///     vec![-1.5, -2.0],
///     vec![1.5, 2.0],
///     vec![2.0, 1.0],
/// ])?;
/// let y = [0, 0, 1, 1];
///
/// let mut clf = BinaryClassifier::new(TrainingConfig::default().with_learning_rate(0.5));
/// clf.fit(&x, &y)?;
/// assert_eq!(clf.predict_default(&[3.0, 3.0])?, 1);
/// # Ok::<(), logistic_regression::LogisticError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BinaryClassifier<F: Scalar> {
    config: TrainingConfig,
    params: Option<ParameterVector<F>>,
    report: Option<TrainingReport>,
}

impl<F: Scalar> BinaryClassifier<F> {
    pub fn new(config: TrainingConfig) -> Self {
        BinaryClassifier {
            config,
            params: None,
            report: None,
        }
    }

    /// Wraps already-trained parameters, e.g. ones deserialized by the caller.
    pub fn from_params(params: ParameterVector<F>, config: TrainingConfig) -> Self {
        BinaryClassifier {
            config,
            params: Some(params),
            report: None,
        }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Trains on `x` and `y`, replacing any previously learned parameters.
    ///
    /// # Errors
    /// - [`LogisticError::InvalidConfig`] if the configuration does not validate.
    /// - [`LogisticError::EmptyDataset`] if `x` has no samples.
    /// - [`LogisticError::LengthMismatch`] if `y.len() != x.n_samples()`.
    /// - [`LogisticError::LabelDomain`] if a label is not `0` or `1`.
    pub fn fit(&mut self, x: &FeatureMatrix<F>, y: &[usize]) -> Result<&ParameterVector<F>> {
        self.config.validate()?;
        validate_labels(x, y, 2)?;

        let objective = BinaryCrossEntropy::new(x, y, self.config.l2_penalty.map(F::lit));
        let initial = ParameterVector::<F>::initialize(x.n_features(), &self.config.initialization);
        let mut optimizer = GradientDescent::<F>::from_config(&self.config);
        let result = optimizer.minimize(&objective, initial.into_inner());

        info!(
            "binary classifier fit: samples={} features={} iterations={} loss={:.6} state={:?}",
            x.n_samples(),
            x.n_features(),
            result.iterations,
            result.final_loss.as_f64(),
            result.state,
        );

        self.report = Some(TrainingReport::from_result(&result));
        let params = ParameterVector::from_flat(result.params)?;
        Ok(&*self.params.insert(params))
    }

    /// Learned parameters, `None` before `fit`.
    pub fn params(&self) -> Option<&ParameterVector<F>> {
        self.params.as_ref()
    }

    /// Summary of the last `fit` call.
    pub fn training_report(&self) -> Option<&TrainingReport> {
        self.report.as_ref()
    }

    fn fitted(&self) -> Result<&ParameterVector<F>> {
        self.params.as_ref().ok_or(LogisticError::NotFitted)
    }

    /// Raw score `w · x + b`; the decision boundary is its zero level set.
    pub fn decision_function(&self, features: &[F]) -> Result<F> {
        self.fitted()?.score(features)
    }

    /// Probability that `features` belongs to class `1`.
    pub fn predict_proba(&self, features: &[F]) -> Result<F> {
        Ok(sigmoid(self.decision_function(features)?))
    }

    /// Class `1` if the probability is at least `threshold`, otherwise class `0`.
    pub fn predict(&self, features: &[F], threshold: F) -> Result<usize> {
        Ok(usize::from(self.predict_proba(features)? >= threshold))
    }

    /// [`predict`](Self::predict) with the `0.5` threshold.
    pub fn predict_default(&self, features: &[F]) -> Result<usize> {
        self.predict(features, F::lit(DEFAULT_THRESHOLD))
    }

    /// Probabilities for every row of `x`.
    pub fn predict_proba_batch(&self, x: &FeatureMatrix<F>) -> Result<Vec<F>> {
        x.rows().map(|row| self.predict_proba(row)).collect()
    }

    /// Labels for every row of `x` using the `0.5` threshold.
    pub fn predict_batch(&self, x: &FeatureMatrix<F>) -> Result<Vec<usize>> {
        x.rows().map(|row| self.predict_default(row)).collect()
    }

    /// Fraction of rows of `x` whose predicted label equals `y`.
    pub fn score(&self, x: &FeatureMatrix<F>, y: &[usize]) -> Result<f64> {
        let predictions = self.predict_batch(x)?;
        crate::metrics::accuracy(y, &predictions)
    }

    /// The hyperplane `w · x + b = 0` separating the two classes, as `(w, b)`.
    ///
    /// With two features the boundary is the line `x_1 = -(w_0 x_0 + b) / w_1`.
    pub fn decision_boundary_params(&self) -> Result<(&[F], F)> {
        let params = self.fitted()?;
        Ok((params.weights(), params.bias()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optim::OptimizerState;

    fn separable() -> (FeatureMatrix<f64>, Vec<usize>) {
        let x = FeatureMatrix::from_rows(vec![
            vec![-2.0, -1.5],
            vec![-1.0, -2.5],
            vec![-3.0, -2.0],
            vec![-1.5, -1.0],
            vec![2.0, 1.5],
            vec![1.0, 2.5],
            vec![3.0, 2.0],
            vec![1.5, 1.0],
        ])
        .unwrap();
        (x, vec![0, 0, 0, 0, 1, 1, 1, 1])
    }

    #[test]
    fn test_fit_separates_margined_classes() {
        let (x, y) = separable();
        let mut clf = BinaryClassifier::new(TrainingConfig::default().with_learning_rate(0.5));
        clf.fit(&x, &y).unwrap();
        assert_eq!(clf.predict_batch(&x).unwrap(), y);
        assert_eq!(clf.score(&x, &y).unwrap(), 1.0);

        let report = clf.training_report().unwrap();
        assert!(report.iterations >= 1 && report.iterations <= 1000);
        assert!(report.final_loss < std::f64::consts::LN_2);
    }

    #[test]
    fn test_unfitted_model_errors() {
        let clf = BinaryClassifier::<f64>::new(TrainingConfig::default());
        assert_eq!(clf.predict_proba(&[0.0, 0.0]), Err(LogisticError::NotFitted));
        assert_eq!(clf.decision_boundary_params().unwrap_err(), LogisticError::NotFitted);
        assert!(clf.params().is_none());
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        let (x, _) = separable();
        let mut clf = BinaryClassifier::new(TrainingConfig::default());
        assert_eq!(
            clf.fit(&x, &[0, 1, 2, 0, 1, 1, 0, 1]).unwrap_err(),
            LogisticError::LabelDomain { label: 2, n_classes: 2 }
        );

        let empty = FeatureMatrix::<f64>::from_rows(Vec::new()).unwrap();
        assert_eq!(clf.fit(&empty, &[]).unwrap_err(), LogisticError::EmptyDataset);

        let mut bad = BinaryClassifier::new(TrainingConfig::default().with_learning_rate(-1.0));
        assert!(matches!(bad.fit(&x, &[0; 8]), Err(LogisticError::InvalidConfig { .. })));
    }

    #[test]
    fn test_predict_dimension_mismatch() {
        let (x, y) = separable();
        let mut clf = BinaryClassifier::new(TrainingConfig::default());
        clf.fit(&x, &y).unwrap();
        assert_eq!(
            clf.predict_default(&[1.0]),
            Err(LogisticError::DimensionMismatch { expected: 2, got: 1 })
        );
    }

    #[test]
    fn test_threshold_controls_label() {
        let params = ParameterVector::new(vec![1.0], 0.0);
        let clf = BinaryClassifier::from_params(params, TrainingConfig::default());
        // sigmoid(1) ~ 0.731
        assert_eq!(clf.predict(&[1.0], 0.7).unwrap(), 1);
        assert_eq!(clf.predict(&[1.0], 0.8).unwrap(), 0);
        assert_eq!(clf.predict_default(&[0.0]).unwrap(), 1);
    }

    #[test]
    fn test_decision_boundary_matches_decision_function() {
        let (x, y) = separable();
        let mut clf = BinaryClassifier::new(TrainingConfig::default());
        clf.fit(&x, &y).unwrap();
        let (w, b) = clf.decision_boundary_params().unwrap();
        assert_eq!(w.len(), 2);
        // A point on the boundary line scores zero.
        let x0 = 0.7;
        let x1 = -(w[0] * x0 + b) / w[1];
        assert!(clf.decision_function(&[x0, x1]).unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_max_iterations_still_yields_model() {
        let (x, y) = separable();
        let config = TrainingConfig::default()
            .with_max_iterations(3)
            .with_convergence_tolerance(0.0);
        let mut clf = BinaryClassifier::new(config);
        clf.fit(&x, &y).unwrap();
        assert_eq!(clf.training_report().unwrap().state, OptimizerState::MaxIterationsReached);
        assert!(clf.predict_default(&[3.0, 3.0]).is_ok());
    }

    #[test]
    fn test_f32_model() {
        let x = FeatureMatrix::from_rows(vec![vec![-1.0_f32], vec![-2.0], vec![1.0], vec![2.0]])
            .unwrap();
        let y = [0, 0, 1, 1];
        let config = TrainingConfig::default().with_learning_rate(1.0);
        let mut clf = BinaryClassifier::<f32>::new(config);
        clf.fit(&x, &y).unwrap();
        assert_eq!(clf.predict_batch(&x).unwrap(), y);
    }
}
