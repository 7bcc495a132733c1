//! Faunalens - animal-face ranking engine
//!
//! Turns raw per-category model output (classifier probabilities or cosine
//! similarities) into a final, policy-compliant result:
//! - Gender-based category exclusion
//! - Top-K ranking with deterministic tie-breaks
//! - Greedy forbidden-pair deduplication (at most 2 categories)
//! - Similarity calibration for embedding backends
//! - Softmax percentage normalization over the survivors

pub mod types;
pub mod error;
pub mod scoring;
pub mod selection;
pub mod engine;
pub mod sources;
pub mod http_source;
pub mod server;

pub use types::*;
pub use error::{ClassifyError, InferenceError, RankError};
pub use engine::{rank, BackendHealth, RankingEngine, SharedRankingEngine};
pub use sources::{MockClassifierSource, MockSimilaritySource, ScoreSource};
pub use http_source::{HttpClassifierSource, HttpEmbeddingSource};
