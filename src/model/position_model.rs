use crate::model::{
    constants,
    structures::{matchup::Matchup, position::Position, raw_record::RawGameRecord}
};

/// Position-specific measurement policy.
///
/// The solver is closed to modification: supporting a new position means
/// implementing this trait and wiring it into the factory, nothing else.
/// `Send + Sync` so independent models can be fitted on worker threads.
pub trait PositionModel: Send + Sync {
    fn position(&self) -> Position;

    /// Per-game performance metric for this position.
    fn base_metric(&self, record: &RawGameRecord) -> f64;

    /// Sample-size measure fed into the weight function.
    fn volume(&self, record: &RawGameRecord) -> f64;

    /// Maps raw volume to a reliability weight in [0, 1].
    fn weight_function(&self, volume: f64) -> f64;

    /// Bayesian shrinkage pseudo-count for player ratings.
    fn prior_strength(&self) -> f64;

    /// Opponent prior = `prior_strength() * opponent_prior_multiplier()`.
    fn opponent_prior_multiplier(&self) -> f64 {
        constants::OPPONENT_PRIOR_MULTIPLIER
    }

    /// Converts raw box-score rows into weighted matchups, skipping rows
    /// that belong to other positions.
    fn prepare_data(&self, records: &[RawGameRecord]) -> Vec<Matchup> {
        records
            .iter()
            .filter(|record| record.position == self.position())
            .map(|record| {
                let volume = self.volume(record);

                Matchup {
                    player_id: record.player_id.clone(),
                    opponent_id: record.opponent_id.clone(),
                    game_id: record.game_id.clone(),
                    base_metric: self.base_metric(record),
                    volume,
                    weight: self.weight_function(volume)
                }
            })
            .collect()
    }
}

/// Wide receivers: EPA per target, weighted by routes run.
pub struct WrModel;

impl PositionModel for WrModel {
    fn position(&self) -> Position {
        Position::WideReceiver
    }

    fn base_metric(&self, record: &RawGameRecord) -> f64 {
        // A game without a target carries no signal; weight handles the rest.
        if record.targets > 0.0 {
            record.epa / record.targets
        } else {
            0.0
        }
    }

    fn volume(&self, record: &RawGameRecord) -> f64 {
        record.routes
    }

    fn weight_function(&self, volume: f64) -> f64 {
        volume.min(constants::WR_VOLUME_CAP) / constants::WR_VOLUME_CAP
    }

    fn prior_strength(&self) -> f64 {
        constants::WR_PRIOR_STRENGTH
    }
}

/// Running backs: EPA per carry. Carries accumulate faster than targets, so
/// the prior is weaker and the volume cap lower.
pub struct RbModel;

impl PositionModel for RbModel {
    fn position(&self) -> Position {
        Position::RunningBack
    }

    fn base_metric(&self, record: &RawGameRecord) -> f64 {
        record.epa / record.carries.max(1.0)
    }

    fn volume(&self, record: &RawGameRecord) -> f64 {
        record.carries
    }

    fn weight_function(&self, volume: f64) -> f64 {
        volume.min(constants::RB_VOLUME_CAP) / constants::RB_VOLUME_CAP
    }

    fn prior_strength(&self) -> f64 {
        constants::RB_PRIOR_STRENGTH
    }
}
