//! Python bindings, built with the `python` feature.
//!
//! Exposes the engine as the `logistic_regression` extension module so notebooks and
//! plotting scripts can train models and read back parameters and metrics.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::common_types::FeatureMatrix;
use crate::config::TrainingConfig;
use crate::error::LogisticError;
use crate::logistic::{BinaryClassifier, OneVsAllClassifier};
use crate::metrics::{ClassificationReport, ConfusionMatrix};

impl From<LogisticError> for PyErr {
    fn from(err: LogisticError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

fn build_config(
    learning_rate: f64,
    max_iterations: usize,
    convergence_tolerance: f64,
    l2_penalty: Option<f64>,
    parallel: bool,
) -> PyResult<TrainingConfig> {
    let config = TrainingConfig {
        learning_rate,
        max_iterations,
        convergence_tolerance,
        l2_penalty,
        parallel,
        ..Default::default()
    };
    config.validate()?;
    Ok(config)
}

#[pyclass(name = "LogisticRegression")]
struct PyLogisticRegression {
    classifier: BinaryClassifier<f64>,
}

#[pymethods]
impl PyLogisticRegression {
    #[new]
    #[pyo3(signature = (
        learning_rate = 0.1,
        max_iterations = 1000,
        convergence_tolerance = 1e-6,
        l2_penalty = None
    ))]
    fn new(
        learning_rate: f64,
        max_iterations: usize,
        convergence_tolerance: f64,
        l2_penalty: Option<f64>,
    ) -> PyResult<Self> {
        let config = build_config(
            learning_rate,
            max_iterations,
            convergence_tolerance,
            l2_penalty,
            false,
        )?;
        Ok(PyLogisticRegression {
            classifier: BinaryClassifier::new(config),
        })
    }

    fn fit(&mut self, x: Vec<Vec<f64>>, y: Vec<usize>) -> PyResult<()> {
        let x = FeatureMatrix::from_rows(x)?;
        self.classifier.fit(&x, &y)?;
        Ok(())
    }

    fn predict_proba(&self, x: Vec<Vec<f64>>) -> PyResult<Vec<f64>> {
        Ok(self.classifier.predict_proba_batch(&FeatureMatrix::from_rows(x)?)?)
    }

    #[pyo3(signature = (x, threshold = 0.5))]
    fn predict(&self, x: Vec<Vec<f64>>, threshold: f64) -> PyResult<Vec<usize>> {
        x.iter()
            .map(|row| self.classifier.predict(row, threshold).map_err(PyErr::from))
            .collect()
    }

    fn decision_function(&self, x: Vec<Vec<f64>>) -> PyResult<Vec<f64>> {
        x.iter()
            .map(|row| self.classifier.decision_function(row).map_err(PyErr::from))
            .collect()
    }

    /// Learned weights, one per feature.
    #[getter]
    fn coef(&self) -> PyResult<Vec<f64>> {
        Ok(self.classifier.decision_boundary_params()?.0.to_vec())
    }

    #[getter]
    fn intercept(&self) -> PyResult<f64> {
        Ok(self.classifier.decision_boundary_params()?.1)
    }

    /// Iterations used by the last `fit`, `None` before fitting.
    #[getter]
    fn n_iter(&self) -> Option<usize> {
        self.classifier.training_report().map(|r| r.iterations)
    }

    #[getter]
    fn loss_history(&self) -> Vec<f64> {
        self.classifier
            .training_report()
            .map(|r| r.loss_history.clone())
            .unwrap_or_default()
    }
}

#[pyclass(name = "OneVsAllClassifier")]
struct PyOneVsAllClassifier {
    classifier: OneVsAllClassifier<f64>,
}

#[pymethods]
impl PyOneVsAllClassifier {
    #[new]
    #[pyo3(signature = (
        n_classes,
        learning_rate = 0.1,
        max_iterations = 1000,
        convergence_tolerance = 1e-6,
        l2_penalty = None,
        parallel = false
    ))]
    fn new(
        n_classes: usize,
        learning_rate: f64,
        max_iterations: usize,
        convergence_tolerance: f64,
        l2_penalty: Option<f64>,
        parallel: bool,
    ) -> PyResult<Self> {
        let config = build_config(
            learning_rate,
            max_iterations,
            convergence_tolerance,
            l2_penalty,
            parallel,
        )?;
        Ok(PyOneVsAllClassifier {
            classifier: OneVsAllClassifier::new(n_classes, config)?,
        })
    }

    fn fit(&mut self, x: Vec<Vec<f64>>, y: Vec<usize>) -> PyResult<()> {
        let x = FeatureMatrix::from_rows(x)?;
        self.classifier.fit(&x, &y)?;
        Ok(())
    }

    fn predict(&self, x: Vec<Vec<f64>>) -> PyResult<Vec<usize>> {
        Ok(self.classifier.predict_batch(&FeatureMatrix::from_rows(x)?)?)
    }

    fn predict_proba(&self, x: Vec<Vec<f64>>) -> PyResult<Vec<Vec<f64>>> {
        x.iter()
            .map(|row| self.classifier.predict_proba(row).map_err(PyErr::from))
            .collect()
    }
}

/// Confusion matrix of `y_true` against `y_pred` as a list of rows.
#[pyfunction]
fn confusion_matrix(y_true: Vec<usize>, y_pred: Vec<usize>) -> PyResult<Vec<Vec<usize>>> {
    let cm = ConfusionMatrix::from_labels(&y_true, &y_pred)?;
    Ok((0..cm.n_classes()).map(|k| cm.row(k)).collect())
}

/// Accuracy plus per-class precision, recall, f1 and support, as a dict.
#[pyfunction]
fn classification_report<'py>(
    py: Python<'py>,
    y_true: Vec<usize>,
    y_pred: Vec<usize>,
) -> PyResult<Bound<'py, PyDict>> {
    let report = ClassificationReport::from_labels(&y_true, &y_pred)?;
    let dict = PyDict::new_bound(py);
    dict.set_item("accuracy", report.accuracy)?;
    dict.set_item("precision", report.per_class.iter().map(|m| m.precision).collect::<Vec<_>>())?;
    dict.set_item("recall", report.per_class.iter().map(|m| m.recall).collect::<Vec<_>>())?;
    dict.set_item("f1", report.per_class.iter().map(|m| m.f1).collect::<Vec<_>>())?;
    dict.set_item("support", report.per_class.iter().map(|m| m.support).collect::<Vec<_>>())?;
    Ok(dict)
}

/// The name of this function must match the `lib.name` in `Cargo.toml`.
#[pymodule]
fn logistic_regression(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(confusion_matrix, m)?)?;
    m.add_function(wrap_pyfunction!(classification_report, m)?)?;
    m.add_class::<PyLogisticRegression>()?;
    m.add_class::<PyOneVsAllClassifier>()?;
    Ok(())
}
