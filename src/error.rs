//! Error taxonomy for inference backends and the ranking engine

use crate::types::Category;
use thiserror::Error;

/// Failures reported by an inference backend
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Definitive per-image failure; never retried on a fallback backend
    #[error("no face detected in the image")]
    NoFaceDetected,

    #[error("model backend unavailable: {0}")]
    ModelUnavailable(String),

    #[error("malformed backend output: {0}")]
    InvalidOutput(String),
}

/// Precondition violations in the pure ranking engine.
/// An empty score map is NOT an error; it ranks to an empty result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RankError {
    #[error("non-finite score for category '{0}'")]
    NonFiniteScore(Category),
}

/// Top-level classification failure
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    Rank(#[from] RankError),

    #[error("no inference backends configured")]
    NoBackends,
}
