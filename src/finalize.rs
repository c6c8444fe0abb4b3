use log::{debug, warn};
use std::collections::HashMap;

use crate::constants::FLOOR_EPSILON;
use crate::entry::{FinishingEntry, PayoutRecord};
use crate::ties::TieShare;

/// Whole currency units owed for `percentage` of `purse`, rounded down.
pub fn floor_amount(purse: i64, percentage: f64) -> i64 {
    (purse as f64 * percentage / 100.0 + FLOOR_EPSILON).floor() as i64
}

/// Sum of all amounts in a payout set
pub fn total_paid(records: &[PayoutRecord]) -> i64 {
    records.iter().map(|r| r.amount).sum()
}

/// Convert percentages to money so the total equals `purse` exactly.
///
/// Every amount is floored, and the rounding remainder goes to the paid
/// player with the worst position (the last one by player id when that
/// position is tied). Records are sorted by position before the target is
/// chosen, so callers may pass the leaderboard in any order; an unsorted
/// leaderboard is logged but still paid correctly.
///
/// # Arguments
/// * `cut_players` - Players who made the cut
/// * `shares` - Tie-resolved percentages keyed by player id
/// * `purse` - Total prize money in currency units
///
/// # Returns
/// One record per paid player, sorted by position
pub fn finalize(
    cut_players: &[FinishingEntry],
    shares: &HashMap<String, TieShare>,
    purse: i64,
) -> Vec<PayoutRecord> {
    if cut_players.is_empty() {
        return Vec::new();
    }

    if cut_players.windows(2).any(|w| w[0].position > w[1].position) {
        warn!(
            "Finishing list of {} players is not sorted by position; sorting before the rounding adjustment",
            cut_players.len()
        );
    }

    let mut records: Vec<PayoutRecord> = Vec::with_capacity(cut_players.len());
    for entry in cut_players {
        let Some(share) = shares.get(&entry.player_id) else {
            warn!(
                "No payout share for {} at position {}, leaving unpaid",
                entry.player_id, entry.position
            );
            continue;
        };
        records.push(PayoutRecord {
            player_id: entry.player_id.clone(),
            position: share.position,
            percentage: share.percentage,
            amount: floor_amount(purse, share.percentage),
            tied: share.tied,
            tied_count: share.tied_count,
        });
    }

    records.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then_with(|| a.player_id.cmp(&b.player_id))
    });

    let adjustment = purse - total_paid(&records);
    if adjustment < 0 || adjustment >= records.len() as i64 {
        warn!(
            "Rounding adjustment of {} across {} records is larger than flooring can leave",
            adjustment,
            records.len()
        );
    }
    if let Some(last) = records.last_mut() {
        if adjustment != 0 {
            debug!(
                "Rounding adjustment of {} to {} at position {}",
                adjustment, last.player_id, last.position
            );
            last.amount += adjustment;
        }
    }

    records
}
