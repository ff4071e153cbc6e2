//! 0-100 sustainability indicator.

use super::recommend::{Recommendation, RecommendationKind};

/// Points for headroom at a capacity ratio of 2 or more.
const HEADROOM_POINTS: f64 = 70.0;
/// Bonus when solar was recommended.
const SOLAR_BONUS: f64 = 15.0;
/// Bonus when any flexible-load option was recommended.
const FLEXIBILITY_BONUS: f64 = 15.0;

/// Compresses headroom and the emitted recommendations into a score.
pub fn eco_score(capacity_ratio: f64, recommendations: &[Recommendation]) -> u8 {
    let headroom = if capacity_ratio.is_finite() {
        capacity_ratio.clamp(0.0, 2.0) / 2.0 * HEADROOM_POINTS
    } else {
        0.0
    };

    let mut score = headroom;
    if recommendations
        .iter()
        .any(|r| r.kind == RecommendationKind::Solar)
    {
        score += SOLAR_BONUS;
    }
    if recommendations.iter().any(|r| r.kind.is_flexible_load()) {
        score += FLEXIBILITY_BONUS;
    }

    score.clamp(0.0, 100.0).round() as u8
}
