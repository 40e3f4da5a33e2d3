use indexmap::IndexMap;

use crate::model::structures::matchup::Matchup;

/// One matchup as seen from one side of the bipartite relation.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedObservation {
    /// Base metric minus the league average.
    pub deviation: f64,
    /// The entity on the other side of this matchup.
    pub other_id: String,
    pub weight: f64
}

/// Per-entity adjacency lists for both sides of the matchup graph.
///
/// Lists preserve input order and map iteration follows first-seen order,
/// which keeps repeated fits on identical input deterministic. Entities
/// whose total observation weight is zero cannot be rated and are omitted
/// from both maps entirely.
#[derive(Debug, Default)]
pub struct ObservationIndex {
    pub by_player: IndexMap<String, Vec<IndexedObservation>>,
    pub by_opponent: IndexMap<String, Vec<IndexedObservation>>
}

impl ObservationIndex {
    pub fn build(matchups: &[Matchup], league_average: f64) -> ObservationIndex {
        let mut by_player: IndexMap<String, Vec<IndexedObservation>> = IndexMap::new();
        let mut by_opponent: IndexMap<String, Vec<IndexedObservation>> = IndexMap::new();

        for matchup in matchups {
            let deviation = matchup.base_metric - league_average;

            by_player
                .entry(matchup.player_id.clone())
                .or_default()
                .push(IndexedObservation {
                    deviation,
                    other_id: matchup.opponent_id.clone(),
                    weight: matchup.weight
                });

            by_opponent
                .entry(matchup.opponent_id.clone())
                .or_default()
                .push(IndexedObservation {
                    deviation,
                    other_id: matchup.player_id.clone(),
                    weight: matchup.weight
                });
        }

        by_player.retain(|_, observations| total_weight(observations) > 0.0);
        by_opponent.retain(|_, observations| total_weight(observations) > 0.0);

        ObservationIndex { by_player, by_opponent }
    }

    /// Total observation weight per player, in index order. Used for the
    /// re-centering step and for effective sample sizes in confidence
    /// intervals.
    pub fn player_weights(&self) -> IndexMap<String, f64> {
        self.by_player
            .iter()
            .map(|(player_id, observations)| (player_id.clone(), total_weight(observations)))
            .collect()
    }
}

pub fn total_weight(observations: &[IndexedObservation]) -> f64 {
    observations.iter().map(|o| o.weight).sum()
}
