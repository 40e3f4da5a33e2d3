use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::model::structures::{matchup::Matchup, position::Position, raw_record::RawGameRecord};

pub fn generate_matchup(
    player_id: &str,
    opponent_id: &str,
    game_id: &str,
    base_metric: f64,
    weight: f64
) -> Matchup {
    Matchup {
        player_id: player_id.to_string(),
        opponent_id: opponent_id.to_string(),
        game_id: game_id.to_string(),
        base_metric,
        volume: weight,
        weight
    }
}

pub fn generate_wr_record(
    player_id: &str,
    opponent_id: &str,
    game_id: &str,
    epa: f64,
    targets: f64,
    routes: f64
) -> RawGameRecord {
    RawGameRecord {
        position: Position::WideReceiver,
        player_id: player_id.to_string(),
        opponent_id: opponent_id.to_string(),
        game_id: game_id.to_string(),
        epa,
        targets,
        routes,
        carries: 0.0
    }
}

pub fn generate_rb_record(
    player_id: &str,
    opponent_id: &str,
    game_id: &str,
    epa: f64,
    carries: f64
) -> RawGameRecord {
    RawGameRecord {
        position: Position::RunningBack,
        player_id: player_id.to_string(),
        opponent_id: opponent_id.to_string(),
        game_id: game_id.to_string(),
        epa,
        targets: 0.0,
        routes: 0.0,
        carries
    }
}

/// Fixed 3 player / 3 opponent / 6 matchup scenario with the WR weight
/// function already applied. Mirrors the sample box scores in main.rs:
/// base metric is EPA per target, weight is routes / 50.
pub fn generate_wr_scenario() -> Vec<Matchup> {
    vec![
        generate_matchup("WR1", "DEF1", "2023_1", 12.5 / 8.0, 0.80),
        generate_matchup("WR1", "DEF2", "2023_2", 8.2 / 6.0, 0.76),
        generate_matchup("WR2", "DEF1", "2023_1", 6.8 / 5.0, 0.70),
        generate_matchup("WR2", "DEF3", "2023_3", 15.3 / 9.0, 0.84),
        generate_matchup("WR3", "DEF2", "2023_2", 4.5 / 4.0, 0.60),
        generate_matchup("WR3", "DEF3", "2023_3", 9.6 / 7.0, 0.72),
    ]
}

/// Dense seeded schedule: every player faces every opponent once per game
/// week, all at full weight. Reproducible across runs.
pub fn generate_dense_matchups(players: usize, opponents: usize, weeks: usize) -> Vec<Matchup> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut matchups = Vec::with_capacity(players * opponents * weeks);

    for week in 0..weeks {
        for player in 0..players {
            for opponent in 0..opponents {
                let base_metric = rng.random_range(-1.0..=3.0);

                matchups.push(generate_matchup(
                    &format!("P{}", player + 1),
                    &format!("D{}", opponent + 1),
                    &format!("2023_{}", week + 1),
                    base_metric,
                    1.0
                ));
            }
        }
    }

    matchups
}
