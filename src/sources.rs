//! Pluggable score sources over the two inference backends

use crate::error::InferenceError;
use crate::types::{BackendKind, ScoreMap};
use async_trait::async_trait;

/// Trait for pluggable inference backends.
///
/// The image is an opaque byte blob; decoding, face detection, and model
/// execution all live behind the backend. The engine only requires a
/// complete `ScoreMap` or a failure.
#[async_trait]
pub trait ScoreSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Selects the post-processing sequence the engine applies to this
    /// backend's raw scores
    fn kind(&self) -> BackendKind;

    /// Score one face image: category -> raw score
    async fn infer(&self, image: &[u8]) -> Result<ScoreMap, InferenceError>;

    /// Reachability probe; local backends are always healthy
    async fn healthy(&self) -> bool {
        true
    }
}

/// Mock classifier backend for testing
pub struct MockClassifierSource {
    scores: ScoreMap,
}

impl MockClassifierSource {
    pub fn new(scores: ScoreMap) -> Self {
        Self { scores }
    }
}

#[async_trait]
impl ScoreSource for MockClassifierSource {
    fn name(&self) -> &'static str {
        "mock_classifier"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Classifier
    }

    async fn infer(&self, _image: &[u8]) -> Result<ScoreMap, InferenceError> {
        Ok(self.scores.clone())
    }
}

/// Mock similarity backend for testing
pub struct MockSimilaritySource {
    similarities: ScoreMap,
}

impl MockSimilaritySource {
    pub fn new(similarities: ScoreMap) -> Self {
        Self { similarities }
    }
}

#[async_trait]
impl ScoreSource for MockSimilaritySource {
    fn name(&self) -> &'static str {
        "mock_similarity"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Similarity
    }

    async fn infer(&self, _image: &[u8]) -> Result<ScoreMap, InferenceError> {
        Ok(self.similarities.clone())
    }
}
