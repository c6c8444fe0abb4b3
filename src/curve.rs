use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::constants::{
    GENERIC_ANCHORS, GENERIC_DECAY, GENERIC_LEAD_FACTOR, MAJOR_MID_TIER_SHARE,
    MAJOR_RUNNER_UP_WEIGHTS, MAJOR_TAIL_SHARE, MAJOR_TOP10_TARGET, MAJOR_WINNER_SHARES, MIN_SHARE,
    NAMED_CURVES, RESCALE_EPSILON, STANDARD_ANCHORS, STANDARD_TOP15_TARGET, STANDARD_TOP25_TARGET,
    TIER_DECLINE_RATIO,
};

/// Category key that selects the standard-event curve
pub const STANDARD_CATEGORY: &str = "standard";

/// Which algorithm produced a curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    /// Registered winner share with fixed tier totals
    Major,
    /// Three-tier curve for ordinary tour events
    Standard,
    /// Three-tier curve with tournament-specific anchors and targets
    Named,
    /// Anchor positions with a geometric fill
    Generic,
}

/// Percentage of the purse paid to each finishing position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PayoutCurve {
    kind: CurveKind,
    shares: BTreeMap<u32, f64>,
}

impl PayoutCurve {
    pub fn empty(kind: CurveKind) -> Self {
        PayoutCurve {
            kind,
            shares: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    /// Share for a position, if the curve pays it
    pub fn get(&self, position: u32) -> Option<f64> {
        self.shares.get(&position).copied()
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.shares.values().sum()
    }

    pub fn winner_share(&self) -> f64 {
        self.get(1).unwrap_or(0.0)
    }

    /// Worst position the curve pays
    pub fn last_position(&self) -> u32 {
        self.shares.keys().next_back().copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.shares.iter().map(|(&p, &pct)| (p, pct))
    }

    pub fn as_map(&self) -> &BTreeMap<u32, f64> {
        &self.shares
    }
}

/// Top-10 anchors plus cumulative targets for a three-tier curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierPlan {
    pub anchors: [f64; 10],
    /// Cumulative percentage through position 15
    pub top15_target: f64,
    /// Cumulative percentage through position 25
    pub top25_target: f64,
}

impl TierPlan {
    pub fn standard() -> Self {
        TierPlan {
            anchors: STANDARD_ANCHORS,
            top15_target: STANDARD_TOP15_TARGET,
            top25_target: STANDARD_TOP25_TARGET,
        }
    }
}

/// Registry of tournament-specific curves.
///
/// Holds no randomness; the same request always yields the same curve.
#[derive(Clone, Debug)]
pub struct CurveBook {
    winner_shares: HashMap<String, f64>,
    named: HashMap<String, TierPlan>,
    standard: TierPlan,
}

impl Default for CurveBook {
    fn default() -> Self {
        let winner_shares = MAJOR_WINNER_SHARES
            .iter()
            .map(|&(name, share)| (name.to_string(), share))
            .collect();
        let named = NAMED_CURVES
            .iter()
            .map(|c| {
                (
                    c.tournament.to_string(),
                    TierPlan {
                        anchors: c.anchors,
                        top15_target: c.top15_target,
                        top25_target: c.top25_target,
                    },
                )
            })
            .collect();
        CurveBook {
            winner_shares,
            named,
            standard: TierPlan::standard(),
        }
    }
}

impl CurveBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a winner share, putting the tournament on the major curve.
    pub fn with_winner_share(mut self, tournament: &str, share: f64) -> Self {
        self.winner_shares.insert(tournament.to_string(), share);
        self
    }

    pub fn with_named_curve(mut self, tournament: &str, plan: TierPlan) -> Self {
        self.named.insert(tournament.to_string(), plan);
        self
    }

    pub fn winner_share_for(&self, tournament: &str) -> Option<f64> {
        self.winner_shares.get(tournament).copied()
    }

    /// Algorithm a request would use.
    pub fn kind_for(&self, category: &str, tournament: &str) -> CurveKind {
        if self.winner_shares.contains_key(tournament) {
            CurveKind::Major
        } else if self.named.contains_key(tournament) {
            CurveKind::Named
        } else if category == STANDARD_CATEGORY {
            CurveKind::Standard
        } else {
            CurveKind::Generic
        }
    }

    /// Build the payout curve for `cut_size` paid players.
    ///
    /// Returns an empty curve when nobody made the cut.
    pub fn curve(&self, cut_size: u32, purse: i64, category: &str, tournament: &str) -> PayoutCurve {
        let kind = self.kind_for(category, tournament);
        if cut_size == 0 {
            return PayoutCurve::empty(kind);
        }

        let mut shares = match kind {
            CurveKind::Major => {
                let winner = self.winner_shares.get(tournament).copied().unwrap_or(0.0);
                major_shares(cut_size, winner)
            }
            CurveKind::Named => match self.named.get(tournament) {
                Some(plan) => tiered_shares(cut_size, plan),
                None => tiered_shares(cut_size, &self.standard),
            },
            CurveKind::Standard => tiered_shares(cut_size, &self.standard),
            CurveKind::Generic => generic_shares(cut_size),
        };
        cap_at_winner(&mut shares);
        normalize(&mut shares);

        debug!(
            "{:?} curve for '{}' ({}): {} paid, purse {}, winner {:.3}%",
            kind,
            tournament,
            category,
            cut_size,
            purse,
            shares.get(&1).copied().unwrap_or(0.0)
        );
        PayoutCurve { kind, shares }
    }
}

/// Weights falling linearly from 1.0 to `tail_ratio` across `len` positions.
fn declining_weights(len: usize, tail_ratio: f64) -> Vec<f64> {
    if len <= 1 {
        return vec![1.0; len];
    }
    let step = (1.0 - tail_ratio) / (len - 1) as f64;
    (0..len).map(|i| 1.0 - step * i as f64).collect()
}

/// Weights proportional to `(last + 1 - p)` for positions `first..=last`.
fn countdown_weights(first: u32, last: u32) -> Vec<f64> {
    (first..=last).map(|p| (last + 1 - p) as f64).collect()
}

/// Split `total` over positions starting at `first` in proportion to
/// `weights`, assigning only positions up to `cut_size`.
fn spread(
    shares: &mut BTreeMap<u32, f64>,
    first: u32,
    weights: &[f64],
    total: f64,
    cut_size: u32,
    floor: Option<f64>,
) {
    let weight_sum: f64 = weights.iter().sum();
    if weight_sum <= 0.0 {
        return;
    }
    let total = total.max(0.0);
    for (position, weight) in (first..).zip(weights) {
        if position > cut_size {
            break;
        }
        let mut share = total * weight / weight_sum;
        if let Some(min) = floor {
            share = share.max(min);
        }
        shares.insert(position, share);
    }
}

fn major_shares(cut_size: u32, winner: f64) -> BTreeMap<u32, f64> {
    let mut shares = BTreeMap::new();
    shares.insert(1, winner);
    spread(
        &mut shares,
        2,
        &MAJOR_RUNNER_UP_WEIGHTS,
        MAJOR_TOP10_TARGET - winner,
        cut_size,
        None,
    );
    spread(
        &mut shares,
        11,
        &countdown_weights(11, 25),
        MAJOR_MID_TIER_SHARE,
        cut_size,
        None,
    );
    if cut_size > 25 {
        spread(
            &mut shares,
            26,
            &countdown_weights(26, cut_size),
            MAJOR_TAIL_SHARE,
            cut_size,
            Some(MIN_SHARE),
        );
    }
    shares
}

fn tiered_shares(cut_size: u32, plan: &TierPlan) -> BTreeMap<u32, f64> {
    let mut shares = BTreeMap::new();
    for (position, &anchor) in (1..=cut_size).zip(plan.anchors.iter()) {
        shares.insert(position, anchor);
    }
    let anchor_total: f64 = plan.anchors.iter().sum();
    spread(
        &mut shares,
        11,
        &declining_weights(5, TIER_DECLINE_RATIO),
        plan.top15_target - anchor_total,
        cut_size,
        None,
    );
    spread(
        &mut shares,
        16,
        &declining_weights(10, TIER_DECLINE_RATIO),
        plan.top25_target - plan.top15_target,
        cut_size,
        None,
    );
    if cut_size > 25 {
        spread(
            &mut shares,
            26,
            &countdown_weights(26, cut_size),
            100.0 - plan.top25_target,
            cut_size,
            Some(MIN_SHARE),
        );
    }
    shares
}

fn generic_shares(cut_size: u32) -> BTreeMap<u32, f64> {
    let mut shares = BTreeMap::new();
    for &(position, pct) in GENERIC_ANCHORS.iter() {
        if position <= cut_size {
            shares.insert(position, pct);
        }
    }

    let open: Vec<u32> = (1..=cut_size).filter(|p| !shares.contains_key(p)).collect();
    if open.is_empty() {
        return shares;
    }

    let anchored: f64 = shares.values().sum();
    let even = (100.0 - anchored).max(0.0) / open.len() as f64;
    let mut share = even * GENERIC_LEAD_FACTOR;
    for position in open {
        // Never pay more than the position just ahead
        let ceiling = shares
            .range(..position)
            .next_back()
            .map(|(_, &pct)| pct)
            .unwrap_or(f64::MAX);
        shares.insert(position, share.max(MIN_SHARE).min(ceiling));
        share *= GENERIC_DECAY;
    }
    shares
}

/// Short tails can concentrate a whole tier on one position; keep the
/// winner's share the largest.
fn cap_at_winner(shares: &mut BTreeMap<u32, f64>) {
    let Some(&winner) = shares.get(&1) else {
        return;
    };
    for (_, share) in shares.range_mut(2..) {
        if *share > winner {
            *share = winner;
        }
    }
}

/// One proportional rescale onto exactly 100% unless the drift is float noise.
///
/// Tail floors at `MIN_SHARE` leave long fields slightly over 100.
fn normalize(shares: &mut BTreeMap<u32, f64>) {
    let total: f64 = shares.values().sum();
    if total <= 0.0 || (total - 100.0).abs() <= RESCALE_EPSILON {
        return;
    }
    let scale = 100.0 / total;
    debug!("Rescaling curve total {:.4}% by {:.6}", total, scale);
    for share in shares.values_mut() {
        *share *= scale;
    }
}
