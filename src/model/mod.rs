use thiserror::Error;

use crate::model::{
    constants::{RB_RECENCY_DECAY, WR_RECENCY_DECAY},
    moa_model::MoaModel,
    position_model::{RbModel, WrModel},
    structures::position::Position
};

pub mod baseline;
pub mod constants;
pub mod indexing;
pub mod moa_model;
pub mod position_model;
pub mod report;
pub mod reweighting;
pub mod structures;

/// Errors surfaced synchronously by the model. Everything not listed here
/// (unknown ids, unparseable week numbers) is absorbed as a default-value
/// policy rather than escalated, to keep fits robust on sparse data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("no usable observations: total matchup weight is zero")]
    DegenerateInput
}

/// Creates a fully configured model for a position.
///
/// Receivers decay slowly and get the quality-of-competition second pass;
/// backs decay faster and skip it, since run defense quality varies less
/// week to week.
pub fn create_model(position: Position) -> MoaModel {
    match position {
        Position::WideReceiver => MoaModel::new(Box::new(WrModel), WR_RECENCY_DECAY, true),
        Position::RunningBack => MoaModel::new(Box::new(RbModel), RB_RECENCY_DECAY, false)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{create_model, structures::position::Position};

    #[test]
    fn test_create_model_wires_position_policy() {
        let wr_model = create_model(Position::WideReceiver);
        let rb_model = create_model(Position::RunningBack);

        assert_eq!(wr_model.position().position(), Position::WideReceiver);
        assert_eq!(rb_model.position().position(), Position::RunningBack);
        assert_eq!(wr_model.position().prior_strength(), 200.0);
        assert_eq!(rb_model.position().prior_strength(), 150.0);
    }
}
