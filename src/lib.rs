//! Payout Core - prize money and ranking points for stroke-play tournaments.
//!
//! Builds a percentage-of-purse curve for the players who made the cut,
//! splits tied positions evenly across the ranks they consume, and converts
//! the result to whole currency units that add up to the purse exactly.
//! Optional Python bindings are available behind the `python` feature.

pub mod constants;
pub mod curve;
pub mod engine;
pub mod entry;
pub mod error;
pub mod event_config;
pub mod finalize;
pub mod points;
pub mod ties;

pub use constants::{CURVE_TOLERANCE, MIN_SHARE, POINTS_RUNGS};
pub use curve::{CurveBook, CurveKind, PayoutCurve, TierPlan};
pub use engine::{PayoutEngine, Settlement};
pub use entry::{FinishingEntry, PayoutRecord, PointsAward};
pub use error::{ConfigError, ConfigResult, EngineError, EngineResult};
pub use event_config::{CutLine, EventCatalog, EventConfig, TournamentOverride};
pub use finalize::{finalize, floor_amount, total_paid};
pub use points::{points_for, points_for_tied, PointsTable};
pub use ties::{resolve_ties, TieShare};

#[cfg(feature = "python")]
mod python {
    use pyo3::exceptions::{PyIOError, PyValueError};
    use pyo3::prelude::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use crate::constants::{CURVE_TOLERANCE, MIN_SHARE, POINTS_RUNGS};
    use crate::curve::CurveBook;
    use crate::engine::PayoutEngine;
    use crate::entry::{FinishingEntry, PayoutRecord, PointsAward};
    use crate::error::{ConfigError, EngineError};
    use crate::event_config::EventCatalog;
    use crate::finalize::finalize;
    use crate::ties::resolve_ties;

    impl From<ConfigError> for PyErr {
        fn from(err: ConfigError) -> PyErr {
            match err {
                ConfigError::Io(e) => PyIOError::new_err(format!("Failed to read event catalog: {}", e)),
                other => PyValueError::new_err(other.to_string()),
            }
        }
    }

    impl From<EngineError> for PyErr {
        fn from(err: EngineError) -> PyErr {
            match err {
                EngineError::Config(e) => e.into(),
                other => PyValueError::new_err(other.to_string()),
            }
        }
    }

    fn load_catalog(catalog_path: Option<&str>) -> PyResult<EventCatalog> {
        let catalog = match catalog_path {
            Some(path) => EventCatalog::from_path(path)?,
            None => EventCatalog::builtin()?,
        };
        Ok(catalog)
    }

    fn to_entries(leaderboard: Vec<(String, u32, bool, i32)>) -> Vec<FinishingEntry> {
        leaderboard
            .into_iter()
            .map(|(player_id, position, made_cut, score)| {
                FinishingEntry::new(player_id, position, made_cut, score)
            })
            .collect()
    }

    /// Percentage curve as a position -> percent dict.
    #[pyfunction]
    #[pyo3(signature = (cut_size, purse, category, tournament))]
    fn payout_curve(cut_size: u32, purse: i64, category: &str, tournament: &str) -> BTreeMap<u32, f64> {
        CurveBook::default()
            .curve(cut_size, purse, category, tournament)
            .as_map()
            .clone()
    }

    /// Pay a finishing list of (player_id, position, made_cut, score) tuples.
    #[pyfunction]
    #[pyo3(signature = (tournament, category, purse, leaderboard))]
    fn settle_payouts(
        tournament: &str,
        category: &str,
        purse: i64,
        leaderboard: Vec<(String, u32, bool, i32)>,
    ) -> Vec<PayoutRecord> {
        let cut_players: Vec<FinishingEntry> = to_entries(leaderboard)
            .into_iter()
            .filter(|e| e.made_cut)
            .collect();
        let curve = CurveBook::default().curve(cut_players.len() as u32, purse, category, tournament);
        let shares = resolve_ties(&cut_players, &curve);
        finalize(&cut_players, &shares, purse)
    }

    /// Resolve and settle a tournament, returning payouts and points.
    #[pyfunction]
    #[pyo3(signature = (tournament, leaderboard, seed = None, catalog_path = None))]
    fn settle_tournament(
        tournament: &str,
        leaderboard: Vec<(String, u32, bool, i32)>,
        seed: Option<u64>,
        catalog_path: Option<&str>,
    ) -> PyResult<(Vec<PayoutRecord>, Vec<PointsAward>)> {
        let engine = PayoutEngine::new(Arc::new(load_catalog(catalog_path)?));
        let settlement = engine.settle_by_name(tournament, seed, &to_entries(leaderboard))?;
        Ok((settlement.payouts, settlement.points))
    }

    /// Resolved event configuration as a JSON string.
    #[pyfunction]
    #[pyo3(signature = (tournament, seed = None, catalog_path = None))]
    fn resolve_event(tournament: &str, seed: Option<u64>, catalog_path: Option<&str>) -> PyResult<String> {
        let config = load_catalog(catalog_path)?.resolve_seeded(tournament, seed)?;
        serde_json::to_string(&config).map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Ranking points for a position, averaged across a tie when `tied_count` > 1.
    #[pyfunction]
    #[pyo3(signature = (tournament, position, tied_count = 1, catalog_path = None))]
    fn points_for(
        tournament: &str,
        position: u32,
        tied_count: u32,
        catalog_path: Option<&str>,
    ) -> PyResult<f64> {
        let catalog = load_catalog(catalog_path)?;
        Ok(crate::points::points_for_tied(&catalog, tournament, position, tied_count)?)
    }

    /// Python module definition
    #[pymodule]
    fn payout_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Classes
        m.add_class::<PayoutRecord>()?;
        m.add_class::<PointsAward>()?;

        // Functions
        m.add_function(wrap_pyfunction!(payout_curve, m)?)?;
        m.add_function(wrap_pyfunction!(settle_payouts, m)?)?;
        m.add_function(wrap_pyfunction!(settle_tournament, m)?)?;
        m.add_function(wrap_pyfunction!(resolve_event, m)?)?;
        m.add_function(wrap_pyfunction!(points_for, m)?)?;

        // Constants
        m.add("CURVE_TOLERANCE", CURVE_TOLERANCE)?;
        m.add("MIN_SHARE", MIN_SHARE)?;
        m.add("POINTS_RUNGS", POINTS_RUNGS)?;

        Ok(())
    }
}
