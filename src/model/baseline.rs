use crate::model::{structures::matchup::Matchup, ModelError};

/// Weighted league average of the base metric over all matchups carrying
/// positive weight. Zero-weight matchups are treated as absent.
///
/// Returns [`ModelError::DegenerateInput`] when no usable weight exists, so
/// callers can never divide by zero or propagate NaN ratings from here.
pub fn league_average(matchups: &[Matchup]) -> Result<f64, ModelError> {
    let mut total_weight = 0.0;
    let mut weighted_sum = 0.0;

    for matchup in matchups.iter().filter(|m| m.weight > 0.0) {
        weighted_sum += matchup.base_metric * matchup.weight;
        total_weight += matchup.weight;
    }

    if total_weight <= 0.0 {
        return Err(ModelError::DegenerateInput);
    }

    Ok(weighted_sum / total_weight)
}
