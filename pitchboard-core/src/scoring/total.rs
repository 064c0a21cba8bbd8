use pitchboard_sdk::objects::{DimensionScore, ScoreBreakdown, ScoringCriteria};
use tracing::warn;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

fn sanitize(dimension: &'static str, score: &mut DimensionScore) {
    let raw = score.score;
    let clean = if raw.is_finite() {
        raw.clamp(MIN_SCORE, MAX_SCORE)
    } else {
        MIN_SCORE
    };
    if clean != raw {
        warn!(dimension, raw, clean, "Dimension score out of range, clamped");
        score.score = clean;
    }
}

/// Clamp every sub-score into `0..=100`, mapping non-finite values to 0.
pub fn sanitize_breakdown(mut breakdown: ScoreBreakdown) -> ScoreBreakdown {
    sanitize("idea", &mut breakdown.idea);
    sanitize("technical", &mut breakdown.technical);
    sanitize("tool_use", &mut breakdown.tool_use);
    sanitize("presentation", &mut breakdown.presentation);
    breakdown
}

/// Weighted mean of the four dimensions, rounded to two decimals.
///
/// Weights that are negative or non-finite count as zero. If nothing is left,
/// every dimension weighs the same. Weights are scaled by the largest one
/// first, so the result is finite for any finite weights.
pub fn weighted_total(breakdown: &ScoreBreakdown, criteria: &ScoringCriteria) -> f64 {
    let weight = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
    let mut pairs = [
        (weight(criteria.idea), breakdown.idea.score),
        (weight(criteria.technical), breakdown.technical.score),
        (weight(criteria.tool_use), breakdown.tool_use.score),
        (weight(criteria.presentation), breakdown.presentation.score),
    ];
    let max_weight = pairs.iter().map(|(w, _)| *w).fold(0.0, f64::max);
    for pair in &mut pairs {
        pair.0 = if max_weight > 0.0 {
            pair.0 / max_weight
        } else {
            1.0
        };
    }
    let weight_sum: f64 = pairs.iter().map(|(w, _)| w).sum();
    let total = pairs.iter().map(|(w, s)| w * s).sum::<f64>() / weight_sum;
    if !total.is_finite() {
        warn!(total, "Weighted total is not finite, using minimum score");
        return MIN_SCORE;
    }
    (total * 100.0).round() / 100.0
}
