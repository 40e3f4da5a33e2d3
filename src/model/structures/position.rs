use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Positions with a measurement policy implemented for them.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum Position {
    #[serde(rename = "WR")]
    #[strum(serialize = "WR")]
    WideReceiver,
    #[serde(rename = "RB")]
    #[strum(serialize = "RB")]
    RunningBack
}
