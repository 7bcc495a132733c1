//! Score transforms: gender filtering, similarity calibration, softmax percentages

use crate::types::*;

/// Drop categories disallowed for the given gender preference.
/// `None` passes the map through unchanged; an emptied map is valid and
/// ranks to an empty result downstream.
pub fn gender_filter(mut scores: ScoreMap, gender: Option<Gender>) -> ScoreMap {
    let excluded: &[Category] = match gender {
        Some(Gender::Male) => &FEMALE_PREFERRED,
        Some(Gender::Female) => &MALE_PREFERRED,
        None => return scores,
    };

    for &category in excluded {
        scores.remove(category);
    }
    scores
}

/// Widen the dynamic range of cosine similarities before ranking.
///
/// Two steps: if the top similarity exceeds `cap`, rescale the whole map by
/// `cap / max` (clamped to 1.0); then, if the top two survivors sit within
/// `closeness` of each other, push them apart by `boost` so a single winner
/// emerges. Runs before top-K selection, so the nudged values decide which
/// categories survive.
pub fn calibrate_similarity(scores: ScoreMap, params: &CalibrationParams) -> ScoreMap {
    let Some(max_val) = scores.max_score() else {
        return scores;
    };

    let mut calibrated = if max_val > params.cap {
        let scale = params.cap / max_val;
        scores
            .entries()
            .into_iter()
            .map(|(c, s)| (c, (s * scale).min(1.0)))
            .collect()
    } else {
        scores
    };

    let ranked = calibrated.ranked();
    if ranked.len() >= 2 {
        let (top, v1) = ranked[0];
        let (runner_up, v2) = ranked[1];
        if v1 - v2 < params.closeness {
            calibrated.insert(top, (v1 + params.boost).min(1.0));
            calibrated.insert(runner_up, (v2 - params.boost).max(0.0));
        }
    }

    calibrated
}

/// Numerically-stable softmax over the surviving finalists only, expressed
/// as percentages rounded to one decimal. Input order is preserved.
pub fn softmax_percentages(finalists: &[(Category, f32)]) -> Vec<RankedEntry> {
    if finalists.is_empty() {
        return Vec::new();
    }

    let max = finalists
        .iter()
        .map(|&(_, s)| s as f64)
        .fold(f64::NEG_INFINITY, f64::max);

    let exps: Vec<f64> = finalists
        .iter()
        .map(|&(_, s)| (s as f64 - max).exp())
        .collect();
    let sum: f64 = exps.iter().sum();

    finalists
        .iter()
        .zip(exps)
        .map(|(&(category, _), e)| RankedEntry {
            category,
            percentage: (e / sum * 1000.0).round() / 10.0,
        })
        .collect()
}

/// Cosine similarity between an extracted embedding and a category mean
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    dot / (norm_a * norm_b + 1e-10)
}
