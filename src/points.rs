use serde::{Deserialize, Serialize};

use crate::constants::{scaled_ladder, POINTS_RUNGS};
use crate::error::ConfigResult;
use crate::event_config::EventCatalog;

/// Bucket values for events paid on the coarse table.
///
/// Thresholds are winner, runner-up, top 3, top 5, top 10, top 20 and top 30.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Buckets {
    pub winner: f64,
    pub runner_up: f64,
    pub top3: f64,
    pub top5: f64,
    pub top10: f64,
    pub top20: f64,
    pub top30: f64,
    pub made_cut: f64,
}

/// How a category declares its points table in the catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum PointsSpec {
    /// Standard 85-rung ladder scaled to `winner`
    Granular { winner: f64, made_cut: f64 },
    Bucketed(Buckets),
}

impl PointsSpec {
    pub fn build(&self) -> PointsTable {
        match self {
            PointsSpec::Granular { winner, made_cut } => PointsTable::Granular {
                rungs: scaled_ladder(*winner).to_vec(),
                made_cut: *made_cut,
            },
            PointsSpec::Bucketed(buckets) => PointsTable::Bucketed(buckets.clone()),
        }
    }
}

/// Ranking points by finishing position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum PointsTable {
    /// One value per position up to 85, `made_cut` beyond
    Granular { rungs: Vec<f64>, made_cut: f64 },
    Bucketed(Buckets),
}

impl PointsTable {
    /// Raw points for a single position. Not tie-aware.
    pub fn points(&self, position: u32) -> f64 {
        if position == 0 {
            return 0.0;
        }
        match self {
            PointsTable::Granular { rungs, made_cut } => {
                let idx = position as usize - 1;
                if idx < POINTS_RUNGS {
                    rungs.get(idx).copied().unwrap_or(*made_cut)
                } else {
                    *made_cut
                }
            }
            PointsTable::Bucketed(b) => match position {
                1 => b.winner,
                2 => b.runner_up,
                3 => b.top3,
                4..=5 => b.top5,
                6..=10 => b.top10,
                11..=20 => b.top20,
                21..=30 => b.top30,
                _ => b.made_cut,
            },
        }
    }

    /// Points for a player in a tie of `tied_count` at `position`.
    ///
    /// Averages the raw values over the block of ranks the tie consumes,
    /// the same way payouts are averaged.
    pub fn points_tied(&self, position: u32, tied_count: u32) -> f64 {
        if tied_count <= 1 {
            return self.points(position);
        }
        let total: f64 = (position..position + tied_count).map(|p| self.points(p)).sum();
        total / tied_count as f64
    }

    pub fn winner_points(&self) -> f64 {
        self.points(1)
    }

    pub fn made_cut_points(&self) -> f64 {
        match self {
            PointsTable::Granular { made_cut, .. } => *made_cut,
            PointsTable::Bucketed(b) => b.made_cut,
        }
    }
}

/// Ranking points for `position` at the named tournament.
///
/// Two players tied at the same position both receive that position's raw
/// value; use [`points_for_tied`] for the averaged award.
pub fn points_for(catalog: &EventCatalog, tournament: &str, position: u32) -> ConfigResult<f64> {
    Ok(catalog.points_table_for(tournament)?.points(position))
}

/// Tie-aware ranking points for one member of a tie of `tied_count` at `position`.
pub fn points_for_tied(
    catalog: &EventCatalog,
    tournament: &str,
    position: u32,
    tied_count: u32,
) -> ConfigResult<f64> {
    Ok(catalog
        .points_table_for(tournament)?
        .points_tied(position, tied_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buckets() -> Buckets {
        Buckets {
            winner: 300.0,
            runner_up: 180.0,
            top3: 120.0,
            top5: 80.0,
            top10: 50.0,
            top20: 25.0,
            top30: 12.0,
            made_cut: 5.0,
        }
    }

    fn catalog() -> EventCatalog {
        EventCatalog::builtin().expect("builtin catalog parses")
    }

    #[test]
    fn test_granular_rungs_and_fallback() {
        let table = PointsSpec::Granular {
            winner: 500.0,
            made_cut: 2.5,
        }
        .build();

        assert!((table.points(1) - 500.0).abs() < 1e-9);
        assert!((table.points(2) - 300.0).abs() < 1e-9);
        assert!((table.points(85) - 5.0).abs() < 1e-9);
        assert!((table.points(86) - 2.5).abs() < 1e-9);
        assert!((table.points(999) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_bucket_boundaries() {
        let table = PointsTable::Bucketed(buckets());
        let expected = [
            (1, 300.0),
            (2, 180.0),
            (3, 120.0),
            (4, 80.0),
            (5, 80.0),
            (6, 50.0),
            (10, 50.0),
            (11, 25.0),
            (20, 25.0),
            (21, 12.0),
            (30, 12.0),
            (31, 5.0),
            (999, 5.0),
        ];
        for (position, points) in expected {
            assert!(
                (table.points(position) - points).abs() < 1e-9,
                "position {} expected {}, got {}",
                position,
                points,
                table.points(position)
            );
        }
    }

    #[test]
    fn test_raw_lookup_is_not_tie_aware() {
        let catalog = catalog();
        // A tie at 2 hands both players the runner-up rung
        let first = points_for(&catalog, "The Masters", 2).unwrap();
        let second = points_for(&catalog, "The Masters", 2).unwrap();
        assert_eq!(first, second);
        let table = catalog.points_table_for("The Masters").unwrap();
        assert_eq!(first, table.points(2));
        assert!(first > table.points(3));
    }

    #[test]
    fn test_tied_lookup_averages_block() {
        let table = PointsSpec::Granular {
            winner: 500.0,
            made_cut: 2.5,
        }
        .build();
        // Positions 2 and 3: (300 + 190) / 2
        assert!((table.points_tied(2, 2) - 245.0).abs() < 1e-9);
        // Single player is the raw value
        assert!((table.points_tied(4, 1) - 135.0).abs() < 1e-9);
        // Block running past the ladder uses the fallback for those ranks
        assert!((table.points_tied(85, 2) - (5.0 + 2.5) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_points_for_winner_and_fallback_match_config() {
        let catalog = catalog();
        for name in ["The Masters", "Sony Open", "Arnold Palmer Invitational", "Zurich Classic"] {
            let table = catalog.points_table_for(name).unwrap();
            assert_eq!(points_for(&catalog, name, 1).unwrap(), table.winner_points());
            assert_eq!(points_for(&catalog, name, 999).unwrap(), table.made_cut_points());
        }
    }

    #[test]
    fn test_position_zero_earns_nothing() {
        let table = PointsTable::Bucketed(buckets());
        assert_eq!(table.points(0), 0.0);
    }
}
