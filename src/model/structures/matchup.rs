use std::fmt;

/// One measured interaction between a player and the opposing unit they
/// faced in a single game.
#[derive(Debug, Clone, PartialEq)]
pub struct Matchup {
    pub player_id: String,
    /// Defense for WR, run defense for RB.
    pub opponent_id: String,
    /// Occasion identifier. Expected to end in `_<week>` when recency
    /// weighting is in use; otherwise only identity matters.
    pub game_id: String,
    /// Position-specific per-game performance measurement.
    pub base_metric: f64,
    /// Raw sample-size measure (routes, carries, ...).
    pub volume: f64,
    /// Reliability weight, initialized from `volume` through the position's
    /// weight function and later rescaled by the recency and quality passes.
    /// Never negative; a zero weight means the matchup is ignored.
    pub weight: f64
}

impl fmt::Display for Matchup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Matchup({} vs {}: {:.3})",
            self.player_id, self.opponent_id, self.base_metric
        )
    }
}
