//! Multinomial (softmax) logistic regression.

use log::info;

use super::one_vs_all::argmax;
use super::TrainingReport;
use crate::common_types::{validate_labels, FeatureMatrix, Scalar};
use crate::config::{Initialization, TrainingConfig};
use crate::error::{LogisticError, Result};
use crate::linear::parameters::{dot, random_values};
use crate::linear::{softmax_into, ParameterVector};
use crate::optim::{GradientDescent, Objective};

/// Mean softmax cross-entropy of a `K`-class linear model.
///
/// Parameters are `K` consecutive blocks of `D + 1` values, one
/// `[w_k0, .., w_k(D-1), b_k]` block per class.
pub struct SoftmaxCrossEntropy<'a, F> {
    x: &'a FeatureMatrix<F>,
    y: &'a [usize],
    n_classes: usize,
    l2_penalty: Option<F>,
}

impl<'a, F: Scalar> SoftmaxCrossEntropy<'a, F> {
    pub fn new(
        x: &'a FeatureMatrix<F>,
        y: &'a [usize],
        n_classes: usize,
        l2_penalty: Option<F>,
    ) -> Self {
        SoftmaxCrossEntropy {
            x,
            y,
            n_classes,
            l2_penalty,
        }
    }
}

impl<F: Scalar> Objective<F> for SoftmaxCrossEntropy<'_, F> {
    fn n_params(&self) -> usize {
        self.n_classes * (self.x.n_features() + 1)
    }

    fn loss_and_gradient(&self, params: &[F]) -> (F, Vec<F>) {
        let stride = self.x.n_features() + 1;
        let d = self.x.n_features();
        let mut grad = vec![F::zero(); params.len()];
        let mut scores = vec![F::zero(); self.n_classes];
        let mut probs = vec![F::zero(); self.n_classes];
        let mut loss = F::zero();

        for (row, &label) in self.x.rows().zip(self.y) {
            for (k, s) in scores.iter_mut().enumerate() {
                let block = &params[k * stride..(k + 1) * stride];
                *s = dot(row, &block[..d]) + block[d];
            }
            softmax_into(&scores, &mut probs);
            loss = loss - probs[label].ln();

            for (k, &p) in probs.iter().enumerate() {
                let residual = if k == label { p - F::one() } else { p };
                let block = &mut grad[k * stride..(k + 1) * stride];
                for (g, &xi) in block[..d].iter_mut().zip(row) {
                    *g = *g + residual * xi;
                }
                block[d] = block[d] + residual;
            }
        }

        if !self.x.is_empty() {
            let n = F::lit(self.x.n_samples() as f64);
            loss = loss / n;
            for g in grad.iter_mut() {
                *g = *g / n;
            }
        }

        if let Some(lambda) = self.l2_penalty {
            let half = F::lit(0.5);
            for k in 0..self.n_classes {
                let weights = &params[k * stride..k * stride + d];
                loss = loss + lambda * half * dot(weights, weights);
                for (g, &w) in grad[k * stride..k * stride + d].iter_mut().zip(weights) {
                    *g = *g + lambda * w;
                }
            }
        }

        (loss, grad)
    }
}

/// Multi-class logistic regression with a single softmax output layer.
///
/// Unlike [`OneVsAllClassifier`](super::OneVsAllClassifier) the `K` linear scores are
/// trained jointly and the predicted probabilities sum to 1.
#[derive(Debug, Clone)]
pub struct SoftmaxClassifier<F: Scalar> {
    n_classes: usize,
    config: TrainingConfig,
    params: Vec<ParameterVector<F>>,
    report: Option<TrainingReport>,
}

impl<F: Scalar> SoftmaxClassifier<F> {
    /// # Errors
    /// [`LogisticError::InvalidConfig`] if `n_classes < 2`.
    pub fn new(n_classes: usize, config: TrainingConfig) -> Result<Self> {
        if n_classes < 2 {
            return Err(LogisticError::InvalidConfig {
                name: "n_classes",
                value: n_classes.to_string(),
            });
        }
        Ok(SoftmaxClassifier {
            n_classes,
            config,
            params: Vec::new(),
            report: None,
        })
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Per-class parameters indexed by class id; empty before `fit`.
    pub fn params(&self) -> &[ParameterVector<F>] {
        &self.params
    }

    pub fn training_report(&self) -> Option<&TrainingReport> {
        self.report.as_ref()
    }

    /// Trains all `K` score functions jointly.
    ///
    /// # Errors
    /// Same as [`OneVsAllClassifier::fit`](super::OneVsAllClassifier::fit).
    pub fn fit(&mut self, x: &FeatureMatrix<F>, y: &[usize]) -> Result<()> {
        self.config.validate()?;
        validate_labels(x, y, self.n_classes)?;

        let l2_penalty = self.config.l2_penalty.map(F::lit);
        let objective = SoftmaxCrossEntropy::new(x, y, self.n_classes, l2_penalty);
        let initial = match self.config.initialization {
            Initialization::Zeros => vec![F::zero(); objective.n_params()],
            Initialization::Random { seed, scale } => {
                random_values(objective.n_params(), seed, scale)
            }
        };
        let result = GradientDescent::<F>::from_config(&self.config).minimize(&objective, initial);

        info!(
            "softmax classifier fit: classes={} samples={} iterations={} loss={:.6} state={:?}",
            self.n_classes,
            x.n_samples(),
            result.iterations,
            result.final_loss.as_f64(),
            result.state,
        );

        self.report = Some(TrainingReport::from_result(&result));
        self.params = result
            .params
            .chunks(x.n_features() + 1)
            .map(|block| ParameterVector::from_flat(block.to_vec()))
            .collect::<Result<Vec<_>>>()?;
        Ok(())
    }

    /// Class probabilities, indexed by class id, summing to 1.
    pub fn predict_proba(&self, features: &[F]) -> Result<Vec<F>> {
        if self.params.len() != self.n_classes {
            return Err(LogisticError::NotFitted);
        }
        let scores = self
            .params
            .iter()
            .map(|p| p.score(features))
            .collect::<Result<Vec<_>>>()?;
        let mut probs = vec![F::zero(); self.n_classes];
        softmax_into(&scores, &mut probs);
        Ok(probs)
    }

    /// Most probable class; ties go to the lowest class index.
    pub fn predict(&self, features: &[F]) -> Result<usize> {
        Ok(argmax(&self.predict_proba(features)?))
    }

    pub fn predict_batch(&self, x: &FeatureMatrix<F>) -> Result<Vec<usize>> {
        x.rows().map(|row| self.predict(row)).collect()
    }
}
