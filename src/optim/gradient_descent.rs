//! Batch gradient descent and its run state machine.

use log::{debug, warn};

use super::Objective;
use crate::common_types::Scalar;
use crate::config::TrainingConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A parameter update rule.
pub trait Optimizer<F> {
    fn update_params(&mut self, params: &mut [F], grad: &[F]);
}

/// Lifecycle of a [`GradientDescent::minimize`] run.
///
/// `Initialized -> Iterating -> (Converged | MaxIterationsReached)`. Both terminal
/// states leave a usable model behind; running out of iterations is only a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OptimizerState {
    Initialized,
    Iterating,
    Converged,
    MaxIterationsReached,
}

impl OptimizerState {
    pub fn is_terminal(self) -> bool {
        matches!(self, OptimizerState::Converged | OptimizerState::MaxIterationsReached)
    }
}

/// Outcome of a minimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult<F> {
    /// Final parameters.
    pub params: Vec<F>,
    /// Loss at `params`.
    pub final_loss: F,
    /// Number of update steps evaluated. A final step that was rolled back is
    /// counted even though `params` predate it.
    pub iterations: usize,
    /// Terminal state, either `Converged` or `MaxIterationsReached`.
    pub state: OptimizerState,
    /// Loss at the initial parameters followed by the loss after every evaluated
    /// step, so it always holds `iterations + 1` entries.
    pub loss_history: Vec<F>,
}

/// Batch gradient descent optimization algorithm.
#[derive(Debug, Clone)]
pub struct GradientDescent<F> {
    learning_rate: F,
    max_iterations: usize,
    tolerance: F,
}

impl<F: Scalar> GradientDescent<F> {
    /// Returns a new `GradientDescent`.
    ///
    /// # Arguments
    /// * `learning_rate` - The *length* of the steps taken on `update_params`.
    /// * `max_iterations` - Hard cap on the number of steps.
    /// * `tolerance` - Minimum loss decrease between consecutive steps to keep going.
    pub fn new(learning_rate: F, max_iterations: usize, tolerance: F) -> Self {
        Self {
            learning_rate,
            max_iterations,
            tolerance,
        }
    }

    pub fn from_config(config: &TrainingConfig) -> Self {
        Self::new(
            F::lit(config.learning_rate),
            config.max_iterations,
            F::lit(config.convergence_tolerance),
        )
    }

    /// Minimizes `objective` starting from `initial`.
    ///
    /// Each iteration takes one step against the gradient and re-evaluates the loss.
    /// Once the decrease falls below the tolerance the run is `Converged`. If that
    /// last step made the loss worse, the parameters from before it are returned so
    /// the reported final step never increases the loss; that rejected step still
    /// counts towards `iterations` and `loss_history`. The loop is deterministic:
    /// identical inputs give identical results.
    pub fn minimize<O>(&mut self, objective: &O, initial: Vec<F>) -> OptimizationResult<F>
    where
        O: Objective<F> + ?Sized,
    {
        debug_assert_eq!(initial.len(), objective.n_params());

        let mut params = initial;
        let (mut loss, mut grad) = objective.loss_and_gradient(&params);
        let mut loss_history = Vec::with_capacity(self.max_iterations.min(4096) + 1);
        loss_history.push(loss);
        let mut state = OptimizerState::Initialized;
        debug!("gradient descent start: loss={loss:?} state={state:?}");

        for iteration in 1..=self.max_iterations {
            state = OptimizerState::Iterating;

            let previous = params.clone();
            self.update_params(&mut params, &grad);
            let (next_loss, next_grad) = objective.loss_and_gradient(&params);
            loss_history.push(next_loss);

            let improvement = loss - next_loss;
            if improvement.is_nan() || improvement < self.tolerance {
                if !(next_loss <= loss) {
                    debug!("loss went from {loss:?} to {next_loss:?}, keeping previous parameters");
                    params = previous;
                } else {
                    loss = next_loss;
                }
                state = OptimizerState::Converged;
                debug!("converged after {iteration} iterations: loss={loss:?}");
                return OptimizationResult {
                    params,
                    final_loss: loss,
                    iterations: iteration,
                    state,
                    loss_history,
                };
            }

            loss = next_loss;
            grad = next_grad;
            if iteration % 100 == 0 {
                debug!("iteration {iteration}: loss={loss:?} state={state:?}");
            }
        }

        state = OptimizerState::MaxIterationsReached;
        warn!(
            "gradient descent stopped after {} iterations without converging: loss={loss:?}",
            self.max_iterations
        );
        OptimizationResult {
            params,
            final_loss: loss,
            iterations: self.max_iterations,
            state,
            loss_history,
        }
    }
}

impl<F: Scalar> Optimizer<F> for GradientDescent<F> {
    /// Takes a step of length `learning_rate` against the gradient.
    fn update_params(&mut self, params: &mut [F], grad: &[F]) {
        let lr = self.learning_rate;

        for (w, &g) in params.iter_mut().zip(grad) {
            *w = *w - lr * g;
        }
    }
}
