//! Candidate selection: top-K ranking and forbidden-pair resolution

use crate::types::*;

/// Top `k` categories descending by score. Bit-identical scores resolve to
/// canonical category order, making the ranking reproducible across runs.
pub fn select_top_k(scores: &ScoreMap, k: usize) -> Vec<Category> {
    scores
        .ranked()
        .into_iter()
        .take(k)
        .map(|(category, _)| category)
        .collect()
}

/// Greedily reduce ranked candidates to at most `max` mutually-compatible
/// categories.
///
/// Candidates are visited in rank order; each is accepted only if it forms
/// no forbidden pair with an already-accepted one. A higher-ranked candidate
/// can permanently block a later, differently-compatible pairing; that
/// asymmetry is intentional (top-ranked-first priority) and user-visible.
pub fn resolve_forbidden(ranked: &[Category], max: usize) -> Vec<Category> {
    let mut accepted = Vec::new();
    for &candidate in ranked {
        let conflict = accepted
            .iter()
            .any(|&kept| is_forbidden_pair(candidate, kept));
        if !conflict {
            accepted.push(candidate);
        }
        if accepted.len() >= max {
            break;
        }
    }
    accepted
}

/// Pairs are unordered; check both orientations
pub fn is_forbidden_pair(a: Category, b: Category) -> bool {
    FORBIDDEN_PAIRS
        .iter()
        .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
}
