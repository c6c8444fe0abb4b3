use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use crate::curve::{CurveBook, CurveKind, PayoutCurve};
use crate::entry::{FinishingEntry, PayoutRecord, PointsAward};
use crate::error::{EngineError, EngineResult};
use crate::event_config::{EventCatalog, EventConfig};
use crate::finalize::finalize;
use crate::ties::resolve_ties;

/// Everything owed for one finished tournament.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub tournament: String,
    pub category: String,
    pub purse: i64,
    /// Players who made the cut
    pub cut_size: u32,
    pub curve_kind: CurveKind,
    /// Sorted by position
    pub payouts: Vec<PayoutRecord>,
    /// Tie-averaged, in the same order as `payouts`
    pub points: Vec<PointsAward>,
}

/// Payout and points engine over an injected event catalog.
#[derive(Clone, Debug)]
pub struct PayoutEngine {
    catalog: Arc<EventCatalog>,
    curves: CurveBook,
}

impl PayoutEngine {
    pub fn new(catalog: Arc<EventCatalog>) -> Self {
        PayoutEngine {
            catalog,
            curves: CurveBook::default(),
        }
    }

    /// Replace the curve registry
    pub fn with_curves(mut self, curves: CurveBook) -> Self {
        self.curves = curves;
        self
    }

    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    pub fn curves(&self) -> &CurveBook {
        &self.curves
    }

    /// Resolve a tournament's configuration from a recorded seed.
    pub fn resolve(&self, tournament: &str, seed: Option<u64>) -> EngineResult<EventConfig> {
        Ok(self.catalog.resolve_seeded(tournament, seed)?)
    }

    pub fn curve_for(&self, config: &EventConfig, cut_size: u32) -> PayoutCurve {
        self.curves
            .curve(cut_size, config.purse, &config.category, &config.name)
    }

    /// Pay out and award points for a finished tournament.
    ///
    /// Only players who made the cut are paid. Each tied group shares the
    /// average of the ranks it consumes, for money and points alike.
    pub fn settle(&self, config: &EventConfig, leaderboard: &[FinishingEntry]) -> EngineResult<Settlement> {
        check_leaderboard(leaderboard)?;

        let cut_players: Vec<FinishingEntry> =
            leaderboard.iter().filter(|e| e.made_cut).cloned().collect();
        let cut_size = cut_players.len() as u32;

        let curve = self.curve_for(config, cut_size);
        let shares = resolve_ties(&cut_players, &curve);
        let payouts = finalize(&cut_players, &shares, config.purse);

        let points = payouts
            .iter()
            .map(|record| PointsAward {
                player_id: record.player_id.clone(),
                position: record.position,
                points: config
                    .points_table
                    .points_tied(record.position, record.tied_count),
                tied_count: record.tied_count,
            })
            .collect();

        info!(
            "Settled '{}': {} of {} players paid from purse {} on the {:?} curve",
            config.name,
            payouts.len(),
            leaderboard.len(),
            config.purse,
            curve.kind()
        );

        Ok(Settlement {
            tournament: config.name.clone(),
            category: config.category.clone(),
            purse: config.purse,
            cut_size,
            curve_kind: curve.kind(),
            payouts,
            points,
        })
    }

    /// Resolve the configuration and settle in one call.
    pub fn settle_by_name(
        &self,
        tournament: &str,
        seed: Option<u64>,
        leaderboard: &[FinishingEntry],
    ) -> EngineResult<Settlement> {
        let config = self.resolve(tournament, seed)?;
        self.settle(&config, leaderboard)
    }

    /// Raw ranking points for a position; not tie-aware.
    pub fn points_for(&self, tournament: &str, position: u32) -> EngineResult<f64> {
        Ok(crate::points::points_for(&self.catalog, tournament, position)?)
    }
}

fn check_leaderboard(leaderboard: &[FinishingEntry]) -> EngineResult<()> {
    let mut seen = HashSet::with_capacity(leaderboard.len());
    for entry in leaderboard {
        if entry.position == 0 {
            return Err(EngineError::InvalidPosition(entry.player_id.clone()));
        }
        if !seen.insert(entry.player_id.as_str()) {
            return Err(EngineError::DuplicatePlayer(entry.player_id.clone()));
        }
    }
    Ok(())
}
