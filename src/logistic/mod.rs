//! Logistic regression classifiers.
//!
//! - [`BinaryClassifier`]: two classes, sigmoid output.
//! - [`OneVsAllClassifier`]: `K` classes as `K` independent binary problems.
//! - [`SoftmaxClassifier`]: `K` classes in a single multinomial model.

pub mod binary;
pub mod one_vs_all;
pub mod softmax;

pub use binary::{BinaryClassifier, DEFAULT_THRESHOLD};
pub use one_vs_all::OneVsAllClassifier;
pub use softmax::SoftmaxClassifier;

use crate::common_types::Scalar;
use crate::optim::{OptimizationResult, OptimizerState};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What a `fit` call did: final loss, iterations used and how the optimizer stopped.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrainingReport {
    pub final_loss: f64,
    pub iterations: usize,
    pub state: OptimizerState,
    /// Loss before the first step followed by the loss after every step.
    pub loss_history: Vec<f64>,
}

impl TrainingReport {
    pub(crate) fn from_result<F: Scalar>(result: &OptimizationResult<F>) -> Self {
        TrainingReport {
            final_loss: result.final_loss.as_f64(),
            iterations: result.iterations,
            state: result.state,
            loss_history: result.loss_history.iter().map(|l| l.as_f64()).collect(),
        }
    }

    pub fn converged(&self) -> bool {
        self.state == OptimizerState::Converged
    }
}
