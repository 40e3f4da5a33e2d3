use serde::{Deserialize, Serialize};

use crate::model::structures::position::Position;

/// One per-game box score row as it comes out of the data source.
///
/// The row shape is shared across positions; fields a position does not use
/// default to zero. Position models pick the fields they care about, so a
/// new stat column only touches this struct and the model that reads it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RawGameRecord {
    pub position: Position,
    pub player_id: String,
    pub opponent_id: String,
    pub game_id: String,
    /// Expected points added over the whole game.
    pub epa: f64,
    #[serde(default)]
    pub targets: f64,
    #[serde(default)]
    pub routes: f64,
    #[serde(default)]
    pub carries: f64
}

#[cfg(test)]
mod tests {
    use crate::model::structures::{position::Position, raw_record::RawGameRecord};

    #[test]
    fn test_deserialize_defaults_unused_stats() {
        let record: RawGameRecord = serde_json::from_str(
            r#"{
                "position": "RB",
                "player_id": "RB1",
                "opponent_id": "RDEF1",
                "game_id": "2023_1",
                "epa": 8.5,
                "carries": 15
            }"#
        )
        .unwrap();

        assert_eq!(record.position, Position::RunningBack);
        assert_eq!(record.carries, 15.0);
        assert_eq!(record.targets, 0.0);
        assert_eq!(record.routes, 0.0);
    }
}
