use std::cmp::Ordering;

use crate::SearchResult;

/// Cosine similarity computed in f32.
///
/// A zero norm is replaced by 1.0, so any pairing with an all-zero vector
/// scores 0.0. The result is not clamped to [-1, 1].
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0_f32;
    let mut norm_a = 0.0_f32;
    let mut norm_b = 0.0_f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let mut norm_a = norm_a.sqrt();
    let mut norm_b = norm_b.sqrt();
    if norm_a == 0.0 {
        norm_a = 1.0;
    }
    if norm_b == 0.0 {
        norm_b = 1.0;
    }
    dot / (norm_a * norm_b)
}

/// Sorts by descending score, breaking ties by ascending document id, and
/// keeps the first `top_k`. NaN scores rank last but keep their raw value.
pub fn rank(mut scored: Vec<SearchResult>, top_k: usize) -> Vec<SearchResult> {
    scored.sort_by(|a, b| {
        sort_key(b.score)
            .partial_cmp(&sort_key(a.score))
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.document.id.cmp(&b.document.id))
    });
    scored.truncate(top_k);
    scored
}

fn sort_key(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        score
    }
}
