//! Evaluation metrics for classifier predictions.
//!
//! Metrics are computed from parallel sequences of true and predicted class ids,
//! independently of the model that produced the predictions, so binary,
//! one-vs-all and softmax classifiers all share them.

mod confusion;
mod report;

pub use confusion::ConfusionMatrix;
pub use report::{ClassMetrics, ClassificationReport};

use crate::error::Result;

/// Builds the confusion matrix and derived metrics for `y_true` against `y_pred`.
///
/// # Errors
/// [`LengthMismatch`](crate::LogisticError::LengthMismatch) if the sequences differ in length.
pub fn evaluate(y_true: &[usize], y_pred: &[usize]) -> Result<ClassificationReport> {
    ClassificationReport::from_labels(y_true, y_pred)
}

/// Fraction of positions where `y_true` and `y_pred` agree.
pub fn accuracy(y_true: &[usize], y_pred: &[usize]) -> Result<f64> {
    Ok(ConfusionMatrix::from_labels(y_true, y_pred)?.accuracy())
}
