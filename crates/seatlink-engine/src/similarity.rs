//! Set and vector similarity primitives used by the scoring tiers.

use std::collections::BTreeSet;

/// Order-insensitive token overlap: share of the smaller set covered by the
/// intersection. Unlike plain Jaccard this scores a partial name against its
/// full registry form as 1.0, which is what the token tier needs for records
/// that drop the trailing locality ("GOVT MEDICAL COLLEGE" vs
/// "GOVT MEDICAL COLLEGE ANANTAPUR").
pub fn token_overlap(set_a: &BTreeSet<String>, set_b: &BTreeSet<String>) -> f64 {
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }
    let intersection = set_a.intersection(set_b).count();
    let smaller = set_a.len().min(set_b.len());
    intersection as f64 / smaller as f64
}

/// Cosine similarity between two precomputed embedding vectors, clamped to
/// [0, 1]. Returns `None` for mismatched dimensions or a zero-norm vector,
/// so callers skip the pair instead of scoring it 0.
pub fn cosine(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    let sim = dot / (norm_a.sqrt() * norm_b.sqrt());
    Some(sim.clamp(0.0, 1.0))
}
