//! Vector similarity helpers used for nearest-neighbour matching over small in-memory sets.

/// Cosine similarity between two vectors.
///
/// Returns `None` when the vectors differ in length, are empty, either has zero norm, or a
/// component is non-finite.
/// Accumulates in `f64` so that `cosine_similarity(v, v)` stays at 1.0 for short vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let x64 = f64::from(x);
        let y64 = f64::from(y);
        dot += x64 * y64;
        norm_a += x64 * x64;
        norm_b += y64 * y64;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if !denom.is_finite() || denom <= f64::EPSILON {
        return None;
    }
    let score = dot / denom;
    if !score.is_finite() {
        return None;
    }
    Some(score.clamp(-1.0, 1.0) as f32)
}

/// Index and value of the highest score. Ties resolve to the earliest index; NaN is skipped.
pub fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((idx, score)),
        }
    }
    best
}
