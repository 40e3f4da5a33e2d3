// Solver tuning defaults. Both are caller-configurable through the model
// builder; these are starting points, not contracts.
pub const DEFAULT_MAX_ITER: usize = 100;
pub const DEFAULT_TOL: f64 = 1e-4;

// Per-position policy constants.
// Receivers see fewer meaningful touches per game than backs, so their
// ratings are regressed harder and their volume cap sits higher.
pub const WR_PRIOR_STRENGTH: f64 = 200.0;
pub const WR_VOLUME_CAP: f64 = 50.0;
pub const WR_RECENCY_DECAY: f64 = 0.95;
pub const RB_PRIOR_STRENGTH: f64 = 150.0;
pub const RB_VOLUME_CAP: f64 = 25.0;
pub const RB_RECENCY_DECAY: f64 = 0.90;

// Opposing units aggregate far more volume than any single player, so their
// shrinkage prior is scaled up relative to the player prior.
pub const OPPONENT_PRIOR_MULTIPLIER: f64 = 1.5;

// Quality reweighting multiplier is 1 + |opponent rating| / QUALITY_DAMPING,
// which stays within roughly [1.0, 1.5] for rating magnitudes near zero.
pub const QUALITY_DAMPING: f64 = 2.0;

// Confidence intervals: players below the effective-weight threshold get a
// fixed-ratio wide interval instead of the empirical Bayes one.
pub const SMALL_SAMPLE_THRESHOLD: f64 = 10.0;
pub const SMALL_SAMPLE_CI_LOWER_RATIO: f64 = 0.7;
pub const SMALL_SAMPLE_CI_UPPER_RATIO: f64 = 1.3;
