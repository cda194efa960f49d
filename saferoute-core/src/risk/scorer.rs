//! Normalization and blending of incident counts into risk scores

use itertools::{Itertools, MinMaxResult};

use super::{IncidentCounts, RiskConfig, RiskTable, SegmentRecord};

/// Blend per-category counts into one risk score per segment.
///
/// Each category is min-max scaled to [0, 1] independently before
/// weighting, so a category with few incidents overall still
/// contributes on the same scale as a frequent one.
pub(crate) fn score_segments(
    segments: &[SegmentRecord],
    counts: &[IncidentCounts],
    config: &RiskConfig,
) -> RiskTable {
    let assault_scores = min_max_scale(counts.iter().map(|c| f64::from(c.assault)).collect());
    let collision_scores = min_max_scale(counts.iter().map(|c| f64::from(c.collision)).collect());

    segments
        .iter()
        .zip(assault_scores)
        .zip(collision_scores)
        .map(|((segment, assault), collision)| {
            let risk = config.assault_weight * assault + config.collision_weight * collision;
            (segment.osm_id.clone(), risk)
        })
        .collect()
}

/// Scale values to [0, 1] via `(v - min) / (max - min)`.
///
/// When all values are equal there is no spread to normalize over and
/// every score is defined as 0.
fn min_max_scale(values: Vec<f64>) -> Vec<f64> {
    match values.iter().copied().minmax() {
        MinMaxResult::MinMax(min, max) if max > min => values
            .into_iter()
            .map(|value| (value - min) / (max - min))
            .collect(),
        _ => vec![0.0; values.len()],
    }
}
