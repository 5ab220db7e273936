use crate::domain::model::{AccuracyTier, GeoPoint};

pub const EXCELLENT_MAX_M: f64 = 2.0;
pub const GOOD_MAX_M: f64 = 5.0;
pub const FAIR_MAX_M: f64 = 10.0;

/// Mean accuracy radius over points that reported one.
pub fn mean_accuracy(points: &[GeoPoint]) -> Option<f64> {
    let (sum, count) = points
        .iter()
        .filter(|p| p.has_accuracy())
        .fold((0.0, 0usize), |(sum, count), p| (sum + p.accuracy_m(), count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

pub fn tier_for_mean(mean_accuracy_m: Option<f64>) -> AccuracyTier {
    match mean_accuracy_m {
        Some(m) if m <= EXCELLENT_MAX_M => AccuracyTier::Excellent,
        Some(m) if m <= GOOD_MAX_M => AccuracyTier::Good,
        Some(m) if m <= FAIR_MAX_M => AccuracyTier::Fair,
        _ => AccuracyTier::Poor,
    }
}

/// Trust tier of a set of fixes. Informational only; never decides whether a fix is accepted.
pub fn classify(points: &[GeoPoint]) -> AccuracyTier {
    tier_for_mean(mean_accuracy(points))
}

/// Display heuristic for capture progress, 0..=100.
///
/// Point coverage contributes up to 60 at `min_points`, the accuracy tier adds a
/// fixed bonus. Not a completeness check.
pub fn progress_percent(point_count: usize, min_points: usize, tier: AccuracyTier) -> u8 {
    let coverage = if min_points == 0 {
        100.0
    } else {
        (point_count as f64 / min_points as f64 * 60.0).min(100.0)
    };
    (coverage + tier.progress_bonus()).min(100.0).round() as u8
}
