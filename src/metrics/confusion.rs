//! Confusion matrix and the per-class metrics derived from it.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{LogisticError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `K x K` table of counts: rows are true classes, columns are predicted classes.
///
/// Built once per evaluation and read-only afterwards. Only non-zero cells are
/// stored and the row and column totals are kept alongside them, so memory and
/// per-class metric cost grow with the number of samples and classes, not `K²`.
/// Every derived metric is total: a zero denominator yields `0.0` instead of NaN.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConfusionMatrix {
    n_classes: usize,
    /// Non-zero cells as `(actual, predicted, count)`, sorted by `(actual, predicted)`.
    cells: Vec<(usize, usize, usize)>,
    /// Row totals, indexed by true class.
    support: Vec<usize>,
    /// Column totals, indexed by predicted class.
    predicted: Vec<usize>,
}

impl ConfusionMatrix {
    /// Tabulates `y_true` against `y_pred`, with `K = max label + 1` over both sequences.
    ///
    /// # Errors
    /// - [`LogisticError::LengthMismatch`] if the sequences differ in length.
    /// - [`LogisticError::LabelDomain`] if a label is `usize::MAX`, leaving no room for `K`.
    pub fn from_labels(y_true: &[usize], y_pred: &[usize]) -> Result<Self> {
        let n_classes = match y_true.iter().chain(y_pred).max() {
            None => 0,
            Some(&max) => max.checked_add(1).ok_or(LogisticError::LabelDomain {
                label: max,
                n_classes: usize::MAX,
            })?,
        };
        Self::with_classes(y_true, y_pred, n_classes)
    }

    /// Tabulates `y_true` against `y_pred` over the fixed domain `[0, n_classes)`.
    ///
    /// # Errors
    /// - [`LogisticError::LengthMismatch`] if the sequences differ in length.
    /// - [`LogisticError::LabelDomain`] if a label is `>= n_classes`.
    pub fn with_classes(y_true: &[usize], y_pred: &[usize], n_classes: usize) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(LogisticError::LengthMismatch {
                expected: y_true.len(),
                got: y_pred.len(),
            });
        }
        if let Some(&label) = y_true.iter().chain(y_pred).find(|&&label| label >= n_classes) {
            return Err(LogisticError::LabelDomain { label, n_classes });
        }

        let mut cells = BTreeMap::new();
        let mut support = vec![0; n_classes];
        let mut predicted = vec![0; n_classes];
        for (&t, &p) in y_true.iter().zip(y_pred) {
            *cells.entry((t, p)).or_insert(0) += 1;
            support[t] += 1;
            predicted[p] += 1;
        }

        Ok(ConfusionMatrix {
            n_classes,
            cells: cells.into_iter().map(|((t, p), count)| (t, p, count)).collect(),
            support,
            predicted,
        })
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Number of samples of class `actual` predicted as `predicted`.
    ///
    /// # Panics
    /// Panics if either index is `>= n_classes()`.
    pub fn get(&self, actual: usize, predicted: usize) -> usize {
        assert!(actual < self.n_classes && predicted < self.n_classes);
        self.cells
            .binary_search_by_key(&(actual, predicted), |&(t, p, _)| (t, p))
            .map_or(0, |i| self.cells[i].2)
    }

    /// Row `actual` of the table, one count per predicted class.
    ///
    /// # Panics
    /// Panics if `actual >= n_classes()`.
    pub fn row(&self, actual: usize) -> Vec<usize> {
        assert!(actual < self.n_classes);
        let mut row = vec![0; self.n_classes];
        let start = self.cells.partition_point(|&(t, _, _)| t < actual);
        for &(_, p, count) in self.cells[start..].iter().take_while(|&&(t, _, _)| t == actual) {
            row[p] = count;
        }
        row
    }

    /// Total number of evaluated samples.
    pub fn total(&self) -> usize {
        self.support.iter().sum()
    }

    pub fn true_positives(&self, class: usize) -> usize {
        self.get(class, class)
    }

    /// Samples of other classes predicted as `class`.
    pub fn false_positives(&self, class: usize) -> usize {
        self.predicted_count(class) - self.true_positives(class)
    }

    /// Samples of `class` predicted as something else.
    pub fn false_negatives(&self, class: usize) -> usize {
        self.support(class) - self.true_positives(class)
    }

    /// Number of samples whose true class is `class`.
    pub fn support(&self, class: usize) -> usize {
        self.support[class]
    }

    /// Number of samples predicted as `class`.
    pub fn predicted_count(&self, class: usize) -> usize {
        self.predicted[class]
    }

    pub fn correct(&self) -> usize {
        self.cells
            .iter()
            .filter(|&&(t, p, _)| t == p)
            .map(|&(_, _, count)| count)
            .sum()
    }

    /// Correct predictions over all predictions; `0.0` for an empty evaluation.
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.total())
    }

    /// `tp / (tp + fp)`, `0.0` when nothing was predicted as `class`.
    pub fn precision(&self, class: usize) -> f64 {
        ratio(self.true_positives(class), self.predicted_count(class))
    }

    /// `tp / (tp + fn)`, `0.0` when `class` never occurs.
    pub fn recall(&self, class: usize) -> f64 {
        ratio(self.true_positives(class), self.support(class))
    }

    /// Harmonic mean of precision and recall, `0.0` when both are zero.
    pub fn f1(&self, class: usize) -> f64 {
        let p = self.precision(class);
        let r = self.recall(class);
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .cells
            .iter()
            .map(|&(_, _, count)| count.to_string().len())
            .chain([self.n_classes.to_string().len() + 2])
            .max()
            .unwrap_or(1);

        write!(f, "{:>width$}", "")?;
        for k in 0..self.n_classes {
            write!(f, " {:>width$}", format!("p{k}"))?;
        }
        writeln!(f)?;
        for actual in 0..self.n_classes {
            write!(f, "{:>width$}", format!("t{actual}"))?;
            for count in self.row(actual) {
                write!(f, " {count:>width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
