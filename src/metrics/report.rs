//! Per-class and macro-averaged classification report.

use std::fmt;

use super::ConfusionMatrix;
use crate::error::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Precision, recall and F1 of one class.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassMetrics {
    pub class: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of samples whose true class is `class`.
    pub support: usize,
}

/// Confusion matrix plus every metric derived from it, ready for tabular rendering.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassificationReport {
    pub confusion_matrix: ConfusionMatrix,
    pub accuracy: f64,
    pub per_class: Vec<ClassMetrics>,
    /// Unweighted means over all classes of the domain.
    pub macro_precision: f64,
    pub macro_recall: f64,
    pub macro_f1: f64,
}

impl ClassificationReport {
    pub fn from_confusion_matrix(confusion_matrix: ConfusionMatrix) -> Self {
        let per_class: Vec<ClassMetrics> = (0..confusion_matrix.n_classes())
            .map(|class| ClassMetrics {
                class,
                precision: confusion_matrix.precision(class),
                recall: confusion_matrix.recall(class),
                f1: confusion_matrix.f1(class),
                support: confusion_matrix.support(class),
            })
            .collect();

        let mean = |f: fn(&ClassMetrics) -> f64| {
            if per_class.is_empty() {
                0.0
            } else {
                per_class.iter().map(f).sum::<f64>() / per_class.len() as f64
            }
        };
        let macro_precision = mean(|m| m.precision);
        let macro_recall = mean(|m| m.recall);
        let macro_f1 = mean(|m| m.f1);

        ClassificationReport {
            accuracy: confusion_matrix.accuracy(),
            confusion_matrix,
            per_class,
            macro_precision,
            macro_recall,
            macro_f1,
        }
    }

    /// Builds the report for parallel true and predicted label sequences.
    pub fn from_labels(y_true: &[usize], y_pred: &[usize]) -> Result<Self> {
        Ok(Self::from_confusion_matrix(ConfusionMatrix::from_labels(y_true, y_pred)?))
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>8} {:>9} {:>9} {:>9} {:>9}",
            "class", "precision", "recall", "f1", "support"
        )?;
        for m in &self.per_class {
            writeln!(
                f,
                "{:>8} {:>9.4} {:>9.4} {:>9.4} {:>9}",
                m.class, m.precision, m.recall, m.f1, m.support
            )?;
        }
        writeln!(
            f,
            "{:>8} {:>9.4} {:>9.4} {:>9.4} {:>9}",
            "macro",
            self.macro_precision,
            self.macro_recall,
            self.macro_f1,
            self.confusion_matrix.total()
        )?;
        writeln!(f, "accuracy: {:.4}", self.accuracy)
    }
}
