use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::curve::PayoutCurve;
use crate::entry::FinishingEntry;

/// A player's effective share of the purse after ties are settled.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TieShare {
    pub position: u32,
    pub percentage: f64,
    pub tied: bool,
    pub tied_count: u32,
}

/// Effective curve percentage for every player on the leaderboard.
///
/// A group of `k` players tied at position `p` consumes ranks
/// `p..p + k - 1` and each member receives the average of the curve over
/// that block. Ranks past the end of the curve drop out of the average;
/// a group whose own position is past the end gets nothing.
///
/// # Arguments
/// * `leaderboard` - Players to pay, ties sharing a position
/// * `curve` - Percentage curve built for this field
///
/// # Returns
/// Map of player id to the share that player is owed
pub fn resolve_ties(leaderboard: &[FinishingEntry], curve: &PayoutCurve) -> HashMap<String, TieShare> {
    let mut groups: BTreeMap<u32, Vec<&FinishingEntry>> = BTreeMap::new();
    for entry in leaderboard {
        groups.entry(entry.position).or_default().push(entry);
    }

    let mut shares = HashMap::with_capacity(leaderboard.len());
    for (position, group) in groups {
        let tied_count = group.len() as u32;

        let block: Vec<f64> = (position..position + tied_count)
            .filter_map(|rank| curve.get(rank))
            .collect();
        if block.is_empty() {
            warn!(
                "Position {} is outside the {}-place curve, skipping {} player(s)",
                position,
                curve.last_position(),
                tied_count
            );
            continue;
        }
        if block.len() < tied_count as usize {
            debug!(
                "Tie of {} at {} runs past the curve end, averaging {} rank(s)",
                tied_count,
                position,
                block.len()
            );
        }

        let percentage = block.iter().sum::<f64>() / block.len() as f64;
        for entry in group {
            shares.insert(
                entry.player_id.clone(),
                TieShare {
                    position,
                    percentage,
                    tied: tied_count > 1,
                    tied_count,
                },
            );
        }
    }

    shares
}
