use indexmap::IndexMap;
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::{debug, info};

use crate::model::{
    baseline::league_average,
    constants::{
        DEFAULT_MAX_ITER, DEFAULT_TOL, SMALL_SAMPLE_CI_LOWER_RATIO, SMALL_SAMPLE_CI_UPPER_RATIO,
        SMALL_SAMPLE_THRESHOLD
    },
    indexing::{IndexedObservation, ObservationIndex},
    position_model::PositionModel,
    reweighting,
    structures::{
        convergence::{ConvergenceStatus, FitSummary},
        matchup::Matchup
    },
    ModelError
};

/// Mutual opponent adjustment model.
///
/// Ratings for players and the units they face are solved simultaneously by
/// alternating regularized least squares: each side's ratings are the
/// shrunk weighted average of its residuals against the other side's current
/// ratings, iterated until neither side moves more than the tolerance.
///
/// One `fit` call is a closed, synchronous computation. It rebuilds both
/// rating maps from zero, so nothing leaks between calls. Independent fits
/// (one per position) share no state and can run on separate instances in
/// parallel; a single instance is not safe to fit from multiple threads.
pub struct MoaModel {
    position: Box<dyn PositionModel>,
    recency_decay: f64,
    quality_weight: bool,
    max_iter: usize,
    tol: f64,
    player_ratings: IndexMap<String, f64>,
    opponent_ratings: IndexMap<String, f64>,
    player_weights: IndexMap<String, f64>,
    league_avg: f64
}

impl MoaModel {
    pub fn new(position: Box<dyn PositionModel>, recency_decay: f64, quality_weight: bool) -> MoaModel {
        MoaModel {
            position,
            recency_decay,
            quality_weight,
            max_iter: DEFAULT_MAX_ITER,
            tol: DEFAULT_TOL,
            player_ratings: IndexMap::new(),
            opponent_ratings: IndexMap::new(),
            player_weights: IndexMap::new(),
            league_avg: 0.0
        }
    }

    pub fn with_tuning(mut self, max_iter: usize, tol: f64) -> MoaModel {
        self.max_iter = max_iter;
        self.tol = tol;
        self
    }

    pub fn position(&self) -> &dyn PositionModel {
        self.position.as_ref()
    }

    pub fn league_average(&self) -> f64 {
        self.league_avg
    }

    pub fn player_ratings(&self) -> &IndexMap<String, f64> {
        &self.player_ratings
    }

    pub fn opponent_ratings(&self) -> &IndexMap<String, f64> {
        &self.opponent_ratings
    }

    /// Fits both rating maps from scratch over the given matchups.
    ///
    /// Surfaces [`ModelError::DegenerateInput`] when the matchups carry no
    /// usable weight. Hitting the iteration cap is not an error; it is
    /// reported through the summary status.
    pub fn fit(&mut self, matchups: &[Matchup]) -> Result<FitSummary, ModelError> {
        self.league_avg = league_average(matchups)?;

        let index = ObservationIndex::build(matchups, self.league_avg);

        self.player_ratings = index.by_player.keys().map(|id| (id.clone(), 0.0)).collect();
        self.opponent_ratings = index.by_opponent.keys().map(|id| (id.clone(), 0.0)).collect();
        self.player_weights = index.player_weights();

        let player_prior = self.position.prior_strength();
        let opponent_prior = player_prior * self.position.opponent_prior_multiplier();

        debug!(
            players = self.player_ratings.len(),
            opponents = self.opponent_ratings.len(),
            league_average = self.league_avg,
            "starting coordinate descent"
        );

        let mut iterations = 0;
        let mut status = ConvergenceStatus::MaxIterExhausted;

        for iteration in 0..self.max_iter {
            iterations = iteration + 1;

            let prev_players = self.player_ratings.clone();
            let prev_opponents = self.opponent_ratings.clone();

            // Players are updated against the previous iteration's opponent
            // snapshot; opponents then see the fresh player ratings. The
            // ordering changes the finite-iteration fixed point and is part
            // of the model's contract.
            for (player_id, observations) in &index.by_player {
                self.player_ratings[player_id] =
                    shrunk_rating(observations, &self.opponent_ratings, 1.0, player_prior);
            }

            for (opponent_id, observations) in &index.by_opponent {
                self.opponent_ratings[opponent_id] =
                    shrunk_rating(observations, &self.player_ratings, -1.0, opponent_prior);
            }

            self.recenter();

            let player_change = max_change(&prev_players, &self.player_ratings);
            let opponent_change = max_change(&prev_opponents, &self.opponent_ratings);

            if player_change < self.tol && opponent_change < self.tol {
                status = ConvergenceStatus::Converged;
                break;
            }
        }

        let summary = FitSummary {
            status,
            iterations,
            league_average: self.league_avg
        };

        info!(
            position = %self.position.position(),
            iterations,
            converged = summary.converged(),
            "fit complete"
        );

        Ok(summary)
    }

    /// Documented two-pass protocol: fit once to establish opponent ratings,
    /// upweight matchups played against extreme opponents, then fit again.
    /// Models configured without quality weighting do a single fit.
    ///
    /// Matchup weights are mutated in place so callers can observe them
    /// between passes.
    pub fn fit_with_quality_weighting(&mut self, matchups: &mut [Matchup]) -> Result<FitSummary, ModelError> {
        let first_pass = self.fit(matchups)?;

        if !self.quality_weight {
            return Ok(first_pass);
        }

        reweighting::apply_quality_weights(matchups, &self.opponent_ratings);
        self.fit(matchups)
    }

    /// Rescales matchup weights by recency using this model's decay rate.
    pub fn apply_recency_weights(&self, matchups: &mut [Matchup], reference_week: i32) {
        reweighting::apply_recency_weights(matchups, self.recency_decay, reference_week);
    }

    /// Expected metric for a matchup. Ids never seen in a fit carry a zero
    /// rating, so unknown players and opponents regress to league average
    /// rather than erroring.
    pub fn predict(&self, player_id: &str, opponent_id: &str) -> f64 {
        self.league_avg + self.player_rating(player_id) - self.opponent_rating(opponent_id)
    }

    pub fn player_rating(&self, player_id: &str) -> f64 {
        self.player_ratings.get(player_id).copied().unwrap_or(0.0)
    }

    pub fn opponent_rating(&self, opponent_id: &str) -> f64 {
        self.opponent_ratings.get(opponent_id).copied().unwrap_or(0.0)
    }

    /// Opponent-neutral metric: league average plus the player's rating.
    pub fn adjusted_metric(&self, player_id: &str) -> f64 {
        self.league_avg + self.player_rating(player_id)
    }

    /// Two-sided interval on the player's rating.
    ///
    /// Players below the effective-weight threshold get a fixed-ratio wide
    /// interval; everyone else gets an empirical Bayes normal interval from
    /// the shrinkage prior. Both branches are documented policy, heuristics
    /// included.
    pub fn confidence_interval(&self, player_id: &str, alpha: f64) -> (f64, f64) {
        let rating = self.player_rating(player_id);
        let effective_n = self.player_weights.get(player_id).copied().unwrap_or(0.0);

        if effective_n < SMALL_SAMPLE_THRESHOLD {
            return (
                rating * SMALL_SAMPLE_CI_LOWER_RATIO,
                rating * SMALL_SAMPLE_CI_UPPER_RATIO
            );
        }

        let prior_variance = 1.0 / self.position.prior_strength();
        let posterior_variance = prior_variance / (effective_n + prior_variance);

        let z_score = Normal::new(0.0, 1.0)
            .expect("standard normal parameters are valid")
            .inverse_cdf(1.0 - alpha / 2.0);
        let ci_width = z_score * posterior_variance.sqrt();

        (rating - ci_width, rating + ci_width)
    }

    /// Pins the additive constant the bipartite system leaves free: the
    /// volume-weighted player mean is pulled to zero and pushed onto the
    /// opponent side, which leaves every `predict` output unchanged.
    fn recenter(&mut self) {
        let total_weight: f64 = self.player_weights.values().sum();
        if total_weight <= 0.0 {
            return;
        }

        let weighted_sum: f64 = self
            .player_ratings
            .iter()
            .map(|(player_id, rating)| rating * self.player_weights.get(player_id).copied().unwrap_or(0.0))
            .sum();
        let weighted_mean = weighted_sum / total_weight;

        for rating in self.player_ratings.values_mut() {
            *rating -= weighted_mean;
        }
        for rating in self.opponent_ratings.values_mut() {
            *rating += weighted_mean;
        }
    }
}

/// Shrunk weighted-average rating for one entity.
///
/// `deviation_sign` is +1 for players (credit for beating the opponent's
/// rating) and -1 for opponents (credit for suppressing the player's
/// metric). Opponents missing from the opposite map count as average. The
/// prior keeps the denominator strictly positive, and index construction
/// guarantees positive total weight per entity.
fn shrunk_rating(
    observations: &[IndexedObservation],
    opposite_ratings: &IndexMap<String, f64>,
    deviation_sign: f64,
    prior_strength: f64
) -> f64 {
    let mut effective_samples = 0.0;
    let mut total_residual = 0.0;

    for observation in observations {
        let opposite = opposite_ratings.get(&observation.other_id).copied().unwrap_or(0.0);
        let residual = deviation_sign * observation.deviation + opposite;

        total_residual += residual * observation.weight;
        effective_samples += observation.weight;
    }

    let raw_rating = total_residual / effective_samples;

    raw_rating * effective_samples / (effective_samples + prior_strength)
}

/// Largest absolute rating movement between two snapshots. Keys are stable
/// within a fit, so iterating the new map covers the union.
fn max_change(old: &IndexMap<String, f64>, new: &IndexMap<String, f64>) -> f64 {
    let mut max = 0.0f64;

    for (id, rating) in new {
        max = max.max((rating - old.get(id).copied().unwrap_or(0.0)).abs());
    }

    max
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use indexmap::IndexMap;

    use crate::{
        model::{
            create_model,
            moa_model::MoaModel,
            position_model::{PositionModel, WrModel},
            structures::{convergence::ConvergenceStatus, matchup::Matchup, position::Position},
            ModelError
        },
        utils::test_utils::{generate_dense_matchups, generate_matchup, generate_wr_scenario}
    };

    fn fitted_wr_model() -> MoaModel {
        let mut model = create_model(Position::WideReceiver);
        model.fit(&generate_wr_scenario()).unwrap();
        model
    }

    #[test]
    fn test_fit_converges_on_scenario() {
        let mut model = create_model(Position::WideReceiver);
        let summary = model.fit(&generate_wr_scenario()).unwrap();

        assert_eq!(summary.status, ConvergenceStatus::Converged);
        assert!(summary.iterations <= 100);
        assert_eq!(model.player_ratings().len(), 3);
        assert_eq!(model.opponent_ratings().len(), 3);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let matchups = generate_wr_scenario();

        let mut model_a = create_model(Position::WideReceiver);
        let mut model_b = create_model(Position::WideReceiver);
        model_a.fit(&matchups).unwrap();
        model_b.fit(&matchups).unwrap();

        // Bit-identical, not just approximately equal.
        assert_eq!(model_a.player_ratings(), model_b.player_ratings());
        assert_eq!(model_a.opponent_ratings(), model_b.opponent_ratings());
    }

    #[test]
    fn test_fit_symmetric_under_relabeling() {
        let matchups = generate_wr_scenario();
        let swapped: Vec<Matchup> = matchups
            .iter()
            .map(|m| {
                let mut swapped = m.clone();
                swapped.player_id = match m.player_id.as_str() {
                    "WR1" => "WR2".to_string(),
                    "WR2" => "WR1".to_string(),
                    other => other.to_string()
                };
                swapped
            })
            .collect();

        let mut model = create_model(Position::WideReceiver);
        let mut relabeled_model = create_model(Position::WideReceiver);
        model.fit(&matchups).unwrap();
        relabeled_model.fit(&swapped).unwrap();

        assert_eq!(
            model.player_rating("WR1"),
            relabeled_model.player_rating("WR2")
        );
        assert_eq!(
            model.player_rating("WR2"),
            relabeled_model.player_rating("WR1")
        );
        assert_eq!(
            model.player_rating("WR3"),
            relabeled_model.player_rating("WR3")
        );
    }

    #[test]
    fn test_fit_centering_invariant() {
        let model = fitted_wr_model();
        let matchups = generate_wr_scenario();

        let mut weights: IndexMap<&str, f64> = IndexMap::new();
        for m in &matchups {
            *weights.entry(m.player_id.as_str()).or_insert(0.0) += m.weight;
        }

        let total: f64 = weights.values().sum();
        let weighted_mean: f64 = model
            .player_ratings()
            .iter()
            .map(|(id, r)| r * weights.get(id.as_str()).unwrap())
            .sum::<f64>()
            / total;

        assert_abs_diff_eq!(weighted_mean, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_fit_rebuilds_state_between_calls() {
        let mut model = create_model(Position::WideReceiver);
        model.fit(&generate_wr_scenario()).unwrap();

        // Refit on a disjoint population; nothing from the first fit survives.
        let other = vec![
            generate_matchup("WR9", "DEF9", "2023_1", 1.0, 0.5),
            generate_matchup("WR8", "DEF9", "2023_1", 2.0, 0.5),
        ];
        model.fit(&other).unwrap();

        assert!(!model.player_ratings().contains_key("WR1"));
        assert_eq!(model.player_ratings().len(), 2);
    }

    #[test]
    fn test_fit_reports_exhaustion_without_convergence() {
        let mut model = create_model(Position::WideReceiver).with_tuning(1, 1e-12);
        let summary = model.fit(&generate_wr_scenario()).unwrap();

        assert_eq!(summary.status, ConvergenceStatus::MaxIterExhausted);
        assert_eq!(summary.iterations, 1);
    }

    #[test]
    fn test_fit_ratings_stay_bounded() {
        let matchups = generate_dense_matchups(5, 4, 6);

        let mut model = create_model(Position::WideReceiver);
        model.fit(&matchups).unwrap();

        let max_deviation = matchups
            .iter()
            .map(|m| m.base_metric.abs())
            .fold(0.0, f64::max);

        for rating in model.player_ratings().values().chain(model.opponent_ratings().values()) {
            assert!(rating.is_finite());
            assert!(rating.abs() <= 2.0 * max_deviation);
        }
    }

    #[test]
    fn test_fit_degenerate_input_errors() {
        let matchups = vec![
            generate_matchup("WR1", "DEF1", "2023_1", 2.0, 0.0),
            generate_matchup("WR2", "DEF2", "2023_2", 3.0, 0.0),
        ];

        let mut model = create_model(Position::WideReceiver);

        assert_eq!(model.fit(&matchups), Err(ModelError::DegenerateInput));
    }

    #[test]
    fn test_shrinkage_pulls_ratings_toward_zero() {
        struct HeavyPrior;

        impl PositionModel for HeavyPrior {
            fn position(&self) -> Position {
                Position::WideReceiver
            }
            fn base_metric(&self, record: &crate::model::structures::raw_record::RawGameRecord) -> f64 {
                WrModel.base_metric(record)
            }
            fn volume(&self, record: &crate::model::structures::raw_record::RawGameRecord) -> f64 {
                WrModel.volume(record)
            }
            fn weight_function(&self, volume: f64) -> f64 {
                WrModel.weight_function(volume)
            }
            fn prior_strength(&self) -> f64 {
                1e9
            }
        }

        let matchups = generate_wr_scenario();

        let mut baseline_model = create_model(Position::WideReceiver);
        let mut heavy_model = MoaModel::new(Box::new(HeavyPrior), 0.95, true);
        baseline_model.fit(&matchups).unwrap();
        heavy_model.fit(&matchups).unwrap();

        for (player_id, rating) in heavy_model.player_ratings() {
            assert_abs_diff_eq!(*rating, 0.0, epsilon = 1e-6);
            assert!(rating.abs() <= baseline_model.player_rating(player_id).abs());
        }
    }

    #[test]
    fn test_predict_consistency() {
        let model = fitted_wr_model();

        for player_id in ["WR1", "WR2", "WR3"] {
            for opponent_id in ["DEF1", "DEF2", "DEF3"] {
                let expected = model.league_average() + model.player_rating(player_id)
                    - model.opponent_rating(opponent_id);

                assert_eq!(model.predict(player_id, opponent_id), expected);
            }
        }
    }

    #[test]
    fn test_predict_unknown_player_defaults_to_average() {
        let model = fitted_wr_model();

        let expected = model.league_average() - model.opponent_rating("DEF1");

        assert_eq!(model.predict("nonexistent_player", "DEF1"), expected);
        assert_eq!(model.predict("nonexistent_player", "nonexistent_opponent"), model.league_average());
    }

    #[test]
    fn test_adjusted_metric() {
        let model = fitted_wr_model();

        assert_eq!(
            model.adjusted_metric("WR1"),
            model.league_average() + model.player_rating("WR1")
        );
        assert_eq!(model.adjusted_metric("nonexistent_player"), model.league_average());
    }

    #[test]
    fn test_fit_with_quality_weighting_runs_two_passes() {
        let mut matchups = generate_wr_scenario();
        let before: Vec<f64> = matchups.iter().map(|m| m.weight).collect();

        let mut model = create_model(Position::WideReceiver);
        let summary = model.fit_with_quality_weighting(&mut matchups).unwrap();

        assert!(summary.converged());

        // Quality multipliers never shrink a weight.
        for (m, old_weight) in matchups.iter().zip(before) {
            assert!(m.weight >= old_weight);
        }
    }

    #[test]
    fn test_fit_with_quality_weighting_disabled_is_single_pass() {
        // RB models are configured without quality weighting.
        let mut matchups = vec![
            generate_matchup("RB1", "RDEF1", "2023_1", 0.5, 0.6),
            generate_matchup("RB1", "RDEF2", "2023_2", 0.7, 0.72),
            generate_matchup("RB2", "RDEF1", "2023_1", 0.4, 0.48),
            generate_matchup("RB2", "RDEF2", "2023_3", 0.6, 0.64),
        ];
        let before: Vec<f64> = matchups.iter().map(|m| m.weight).collect();

        let mut model = create_model(Position::RunningBack);
        model.fit_with_quality_weighting(&mut matchups).unwrap();

        let after: Vec<f64> = matchups.iter().map(|m| m.weight).collect();

        assert_eq!(before, after);
    }

    #[test]
    fn test_confidence_interval_small_sample_fallback() {
        // Scenario players carry well under 10 effective weight.
        let model = fitted_wr_model();
        let rating = model.player_rating("WR1");

        let (lower, upper) = model.confidence_interval("WR1", 0.05);

        assert_abs_diff_eq!(lower, rating * 0.7);
        assert_abs_diff_eq!(upper, rating * 1.3);
    }

    #[test]
    fn test_confidence_interval_empirical_bayes() {
        // Dense schedule: 4 opponents * 6 games at weight 1.0 per player.
        let matchups = generate_dense_matchups(5, 4, 6);
        let mut model = create_model(Position::WideReceiver);
        model.fit(&matchups).unwrap();

        let rating = model.player_rating("P1");
        let (lower, upper) = model.confidence_interval("P1", 0.05);

        let prior_variance: f64 = 1.0 / 200.0;
        let posterior_variance = prior_variance / (24.0 + prior_variance);
        let expected_width = 1.959964 * posterior_variance.sqrt();

        assert_abs_diff_eq!(upper - lower, 2.0 * expected_width, epsilon = 1e-4);
        assert_abs_diff_eq!((upper + lower) / 2.0, rating, epsilon = 1e-12);
        assert!(lower < upper);
    }

    #[test]
    fn test_confidence_interval_narrows_with_alpha() {
        let matchups = generate_dense_matchups(5, 4, 6);
        let mut model = create_model(Position::WideReceiver);
        model.fit(&matchups).unwrap();

        let (lower_95, upper_95) = model.confidence_interval("P1", 0.05);
        let (lower_80, upper_80) = model.confidence_interval("P1", 0.20);

        assert!(upper_80 - lower_80 < upper_95 - lower_95);
    }
}
