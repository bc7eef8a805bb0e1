//! Error type shared by the whole crate.

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, LogisticError>;

/// Errors raised by training, prediction and evaluation.
///
/// All of them describe caller misuse (malformed or mismatched data, invalid
/// hyperparameters). Numerical saturation is never an error; it is clamped where it
/// happens.
#[derive(Debug, thiserror::Error)]
pub enum LogisticError {
    /// A feature vector's length disagrees with the dimension the model was built for.
    #[error("dimension mismatch: expected {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// The training set contains zero samples.
    #[error("the dataset contains no samples")]
    EmptyDataset,

    /// A label is outside `[0, n_classes)`.
    #[error("label {label} is outside the domain [0, {n_classes})")]
    LabelDomain { label: usize, n_classes: usize },

    /// Two sequences that must be parallel have different lengths.
    #[error("length mismatch: expected {expected} entries, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    /// A hyperparameter is out of its valid range.
    #[error("invalid configuration: {name} = {value}")]
    InvalidConfig { name: &'static str, value: String },

    /// The model was used before calling `fit`.
    #[error("the model has not been fitted")]
    NotFitted,

    /// A serialized configuration could not be parsed.
    #[cfg(feature = "serde")]
    #[error("could not parse configuration: {0}")]
    Config(#[from] serde_json::Error),
}

// `serde_json::Error` has no equality, parse errors compare by message.
impl PartialEq for LogisticError {
    fn eq(&self, other: &Self) -> bool {
        use LogisticError::*;
        match (self, other) {
            (
                DimensionMismatch { expected, got },
                DimensionMismatch { expected: e, got: g },
            ) => expected == e && got == g,
            (EmptyDataset, EmptyDataset) | (NotFitted, NotFitted) => true,
            (
                LabelDomain { label, n_classes },
                LabelDomain { label: l, n_classes: k },
            ) => label == l && n_classes == k,
            (
                LengthMismatch { expected, got },
                LengthMismatch { expected: e, got: g },
            ) => expected == e && got == g,
            (
                InvalidConfig { name, value },
                InvalidConfig { name: n, value: v },
            ) => name == n && value == v,
            #[cfg(feature = "serde")]
            (Config(a), Config(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
