use indexmap::IndexMap;
use tracing::debug;

use crate::model::{constants::QUALITY_DAMPING, structures::matchup::Matchup};

/// Decays matchup weights by how many weeks before `reference_week` they
/// were played. The week is the trailing `_<week>` segment of the game id;
/// ids without one keep their current weight, so runs on messy data degrade
/// to partial recency adjustment instead of failing.
pub fn apply_recency_weights(matchups: &mut [Matchup], decay: f64, reference_week: i32) {
    for matchup in matchups.iter_mut() {
        match parse_week(&matchup.game_id) {
            Some(week) => {
                matchup.weight *= decay.powi(reference_week - week);
            }
            None => {
                debug!(game_id = %matchup.game_id, "no parseable week in game id, skipping recency adjustment");
            }
        }
    }
}

/// Mildly upweights matchups played against extreme opponents, using
/// opponent ratings from a prior fit. For rating magnitudes near zero the
/// multiplier stays within roughly [1.0, 1.5]. Opponents missing from the
/// map count as average and keep their weight.
pub fn apply_quality_weights(matchups: &mut [Matchup], opponent_ratings: &IndexMap<String, f64>) {
    for matchup in matchups.iter_mut() {
        let opponent_strength = opponent_ratings
            .get(&matchup.opponent_id)
            .copied()
            .unwrap_or(0.0)
            .abs();

        matchup.weight *= 1.0 + opponent_strength / QUALITY_DAMPING;
    }
}

/// Drops matchups below the reliability floor before a fit pass.
pub fn retain_reliable(matchups: Vec<Matchup>, min_weight: f64) -> Vec<Matchup> {
    matchups.into_iter().filter(|m| m.weight >= min_weight).collect()
}

/// Latest parseable week across a set of matchups; the natural recency
/// reference when the caller does not supply one.
pub fn latest_week(matchups: &[Matchup]) -> Option<i32> {
    matchups.iter().filter_map(|m| parse_week(&m.game_id)).max()
}

fn parse_week(game_id: &str) -> Option<i32> {
    game_id.rsplit('_').next().and_then(|segment| segment.parse().ok())
}
