//! Training hyperparameters.

use crate::error::{LogisticError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the parameter vector is filled before the first optimizer step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Initialization {
    /// Every weight and the bias start at zero.
    #[default]
    Zeros,
    /// Every weight and the bias are drawn uniformly from `[-scale, scale)`
    /// with a generator seeded by `seed`.
    Random { seed: u64, scale: f64 },
}

/// Configuration for gradient descent training.
///
/// Use struct construction with `..Default::default()` or the `with_*` setters.
///
/// ```
/// use logistic_regression::TrainingConfig;
///
/// let config = TrainingConfig::default()
///     .with_learning_rate(0.5)
///     .with_max_iterations(200)
///     .with_l2_penalty(0.01);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrainingConfig {
    /// Step size of every parameter update. Must be strictly positive.
    pub learning_rate: f64,
    /// Hard cap on optimizer iterations. Must be at least 1.
    pub max_iterations: usize,
    /// Minimum loss decrease between iterations to keep optimizing.
    pub convergence_tolerance: f64,
    /// Optional L2 weight-decay coefficient. The bias is never penalised.
    pub l2_penalty: Option<f64>,
    /// Parameter initialization strategy.
    pub initialization: Initialization,
    /// Train one-vs-all members on the rayon thread pool.
    pub parallel: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            max_iterations: 1000,
            convergence_tolerance: 1e-6,
            l2_penalty: None,
            initialization: Initialization::Zeros,
            parallel: false,
        }
    }
}

impl TrainingConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_convergence_tolerance(mut self, tolerance: f64) -> Self {
        self.convergence_tolerance = tolerance;
        self
    }

    pub fn with_l2_penalty(mut self, penalty: f64) -> Self {
        self.l2_penalty = Some(penalty);
        self
    }

    pub fn with_initialization(mut self, initialization: Initialization) -> Self {
        self.initialization = initialization;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Checks every hyperparameter against its valid range.
    ///
    /// # Errors
    /// [`LogisticError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(invalid("learning_rate", self.learning_rate));
        }
        if self.max_iterations == 0 {
            return Err(invalid("max_iterations", self.max_iterations));
        }
        if !(self.convergence_tolerance >= 0.0) {
            return Err(invalid("convergence_tolerance", self.convergence_tolerance));
        }
        if let Some(penalty) = self.l2_penalty {
            if !(penalty >= 0.0 && penalty.is_finite()) {
                return Err(invalid("l2_penalty", penalty));
            }
        }
        if let Initialization::Random { scale, .. } = self.initialization {
            if !(scale > 0.0 && scale.is_finite()) {
                return Err(invalid("initialization.scale", scale));
            }
        }
        Ok(())
    }

    /// Parses and validates a configuration from JSON. Missing fields take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

fn invalid(name: &'static str, value: impl ToString) -> LogisticError {
    LogisticError::InvalidConfig {
        name,
        value: value.to_string(),
    }
}
