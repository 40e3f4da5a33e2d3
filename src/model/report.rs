use itertools::Itertools;
use serde::Serialize;

use crate::model::moa_model::MoaModel;

/// One row of the adjusted-metric leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStanding {
    pub rank: usize,
    pub player_id: String,
    pub rating: f64,
    pub adjusted_metric: f64,
    pub ci_lower: f64,
    pub ci_upper: f64
}

/// Builds the leaderboard for a fitted model, best adjusted metric first.
/// Equal ratings order by player id so the output stays deterministic.
pub fn leaderboard(model: &MoaModel, alpha: f64) -> Vec<PlayerStanding> {
    model
        .player_ratings()
        .iter()
        .sorted_by(|(id_a, rating_a), (id_b, rating_b)| {
            rating_b
                .partial_cmp(rating_a)
                .expect("fitted ratings are finite")
                .then_with(|| id_a.cmp(id_b))
        })
        .enumerate()
        .map(|(index, (player_id, rating))| {
            let (ci_lower, ci_upper) = model.confidence_interval(player_id, alpha);

            PlayerStanding {
                rank: index + 1,
                player_id: player_id.clone(),
                rating: *rating,
                adjusted_metric: model.adjusted_metric(player_id),
                ci_lower,
                ci_upper
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::{
        model::{create_model, report::leaderboard, structures::position::Position},
        utils::test_utils::generate_wr_scenario
    };

    #[test]
    fn test_leaderboard_sorted_descending() {
        let mut model = create_model(Position::WideReceiver);
        model.fit(&generate_wr_scenario()).unwrap();

        let standings = leaderboard(&model, 0.05);

        assert_eq!(standings.len(), 3);
        assert_eq!(standings.iter().map(|s| s.rank).collect_vec(), vec![1, 2, 3]);
        assert!(standings[0].rating >= standings[1].rating);
        assert!(standings[1].rating >= standings[2].rating);
    }

    #[test]
    fn test_leaderboard_rows_match_query_layer() {
        let mut model = create_model(Position::WideReceiver);
        model.fit(&generate_wr_scenario()).unwrap();

        for standing in leaderboard(&model, 0.05) {
            assert_eq!(standing.rating, model.player_rating(&standing.player_id));
            assert_eq!(standing.adjusted_metric, model.adjusted_metric(&standing.player_id));

            let (lower, upper) = model.confidence_interval(&standing.player_id, 0.05);
            assert_eq!((standing.ci_lower, standing.ci_upper), (lower, upper));
        }
    }
}
