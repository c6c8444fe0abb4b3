use serde::{Deserialize, Serialize};

/// One player's line on a final leaderboard.
///
/// Positions are 1-based and tied players share the same value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinishingEntry {
    pub player_id: String,

    pub position: u32,

    pub made_cut: bool,

    /// Aggregate score relative to par
    pub score: i32,
}

impl FinishingEntry {
    pub fn new(player_id: impl Into<String>, position: u32, made_cut: bool, score: i32) -> Self {
        FinishingEntry {
            player_id: player_id.into(),
            position,
            made_cut,
            score,
        }
    }

    /// Shorthand for a player who made the cut
    pub fn cut_made(player_id: impl Into<String>, position: u32, score: i32) -> Self {
        Self::new(player_id, position, true, score)
    }
}

/// Prize money paid to one player.
#[cfg_attr(feature = "python", pyo3::pyclass(get_all))]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PayoutRecord {
    pub player_id: String,

    pub position: u32,

    /// Share of the purse, 0-100
    pub percentage: f64,

    /// Integer currency units
    pub amount: i64,

    pub tied: bool,

    pub tied_count: u32,
}

/// Ranking points credited to one player.
#[cfg_attr(feature = "python", pyo3::pyclass(get_all))]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointsAward {
    pub player_id: String,

    pub position: u32,

    pub points: f64,

    pub tied_count: u32,
}
