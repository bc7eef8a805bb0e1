//! Logistic regression training and evaluation.
//!
//! The crate is organised leaf-first:
//!
//! - [`linear`]: the linear scorer, sigmoid/softmax activations and the parameter vector.
//! - [`optim`]: differentiable objectives and batch gradient descent.
//! - [`logistic`]: binary, one-vs-all and softmax classifiers built on top of them.
//! - [`metrics`]: confusion matrix, accuracy, precision, recall and F1.
//!
//! Training, prediction and evaluation all take plain slices and [`FeatureMatrix`]
//! values and report failures through [`LogisticError`]. The library logs through the
//! `log` facade and never installs a logger itself.
//!
//! ```
//! use logistic_regression::{datasets, metrics, OneVsAllClassifier, TrainingConfig};
//!
//! let centers = vec![vec![0.0, 5.0], vec![5.0, -3.0], vec![-5.0, -3.0]];
//! let (x, y) = datasets::make_blobs::<f64>(90, &centers, 0.8, 7)?;
//!
//! let mut clf = OneVsAllClassifier::new(3, TrainingConfig::default().with_learning_rate(0.1))?;
//! clf.fit(&x, &y)?;
//! let report = metrics::evaluate(&y, &clf.predict_batch(&x)?)?;
//! assert!(report.accuracy > 0.9);
//! # Ok::<(), logistic_regression::LogisticError>(())
//! ```

pub mod common_types;
pub mod config;
pub mod datasets;
pub mod error;
pub mod linear;
pub mod logistic;
pub mod metrics;
pub mod optim;

#[cfg(feature = "python")]
mod python;

pub use common_types::{DataPoint, FeatureMatrix, Scalar};
pub use config::{Initialization, TrainingConfig};
pub use error::{LogisticError, Result};
pub use linear::{sigmoid, ParameterVector};
pub use logistic::{BinaryClassifier, OneVsAllClassifier, SoftmaxClassifier, TrainingReport};
pub use metrics::{ClassificationReport, ConfusionMatrix};
pub use optim::{GradientDescent, OptimizerState};
