//! Linear scoring and the activations applied on top of it.

pub mod activation;
pub mod parameters;

pub use activation::{clamp_probability, sigmoid, softmax_into};
pub use parameters::{score, ParameterVector};
