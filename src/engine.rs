//! Ranking engine: the pure scoring-to-result pipeline plus backend orchestration

use crate::error::{ClassifyError, InferenceError, RankError};
use crate::scoring::{calibrate_similarity, gender_filter, softmax_percentages};
use crate::selection::{resolve_forbidden, select_top_k};
use crate::sources::ScoreSource;
use crate::types::*;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Turn raw per-category scores into a policy-compliant result.
///
/// Classifier sequence: gender filter -> top-K -> forbidden pairs -> softmax.
/// Similarity sequence inserts calibration before top-K so the nudged values
/// decide which categories survive.
///
/// Pure and synchronous; an empty or fully-filtered map yields an empty
/// result. Non-finite scores violate the input contract and are rejected
/// up front.
pub fn rank(
    scores: ScoreMap,
    gender: Option<Gender>,
    backend: BackendKind,
) -> Result<RankingResult, RankError> {
    for (category, score) in scores.entries() {
        if !score.is_finite() {
            return Err(RankError::NonFiniteScore(category));
        }
    }

    let filtered = gender_filter(scores, gender);

    let candidates = match backend {
        BackendKind::Classifier => filtered,
        BackendKind::Similarity => calibrate_similarity(filtered, &CalibrationParams::default()),
    };

    let top = select_top_k(&candidates, TOP_K);
    let finalists = resolve_forbidden(&top, MAX_RESULTS);

    let finalist_scores: Vec<(Category, f32)> = finalists
        .iter()
        .map(|&c| (c, candidates.get(c).unwrap_or(0.0)))
        .collect();

    Ok(RankingResult::new(softmax_percentages(&finalist_scores)))
}

/// Health of one configured backend
#[derive(Debug, Serialize)]
pub struct BackendHealth {
    pub name: String,
    pub kind: BackendKind,
    pub healthy: bool,
}

/// Main ranking engine (thread-safe via Arc).
///
/// Sources are tried in order: when a backend is unavailable the next one
/// takes over (e.g. remote classifier falling back to the embedding
/// service). `NoFaceDetected` is definitive and short-circuits the chain.
pub struct RankingEngine {
    pub sources: Vec<Box<dyn ScoreSource>>,
}

pub type SharedRankingEngine = Arc<RankingEngine>;

impl RankingEngine {
    pub fn new(sources: Vec<Box<dyn ScoreSource>>) -> SharedRankingEngine {
        Arc::new(Self { sources })
    }

    /// Score an image through the backend chain and rank the result
    pub async fn classify(
        &self,
        image: &[u8],
        gender: Option<Gender>,
    ) -> Result<Classification, ClassifyError> {
        let mut last_err: Option<InferenceError> = None;

        for source in &self.sources {
            match source.infer(image).await {
                Ok(scores) => {
                    info!(
                        "Scored image via '{}' backend ({} categories)",
                        source.name(),
                        scores.len()
                    );
                    let result = rank(scores, gender, source.kind())?;
                    return Ok(Classification::from_result(result));
                }
                Err(InferenceError::NoFaceDetected) => {
                    return Err(InferenceError::NoFaceDetected.into());
                }
                Err(e) => {
                    warn!("Backend '{}' failed: {}. Trying next backend.", source.name(), e);
                    last_err = Some(e);
                }
            }
        }

        match last_err {
            Some(e) => Err(e.into()),
            None => Err(ClassifyError::NoBackends),
        }
    }

    /// Probe all configured backends concurrently
    pub async fn health_report(&self) -> Vec<BackendHealth> {
        let checks = self.sources.iter().map(|source| async move {
            BackendHealth {
                name: source.name().to_string(),
                kind: source.kind(),
                healthy: source.healthy().await,
            }
        });

        futures::future::join_all(checks).await
    }
}
