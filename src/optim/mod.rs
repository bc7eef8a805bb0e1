//! Training objectives and the gradient descent loop that minimizes them.

pub mod gradient_descent;
pub mod objective;

pub use gradient_descent::{GradientDescent, OptimizationResult, Optimizer, OptimizerState};
pub use objective::{binary_cross_entropy, BinaryCrossEntropy, Objective};
