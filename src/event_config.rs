use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::points::{PointsSpec, PointsTable};

const BUILTIN_CATALOG: &str = include_str!("../config/event_types.json");

/// Category used when no override or keyword rule matches
pub const DEFAULT_CATEGORY: &str = "standard";

/// Rule deciding how many entrants play the weekend.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CutLine {
    /// Top N and ties
    Position(u32),
    /// Everyone at or under this score relative to par
    Score(i32),
    /// No cut, every starter is paid
    None,
}

/// Integer range, optionally rounded to the nearest multiple of `round_to`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i64,
    pub max: i64,
    #[serde(default)]
    pub round_to: Option<i64>,
}

impl IntRange {
    pub fn sample<R: Rng>(&self, rng: &mut R) -> i64 {
        let raw = if self.min == self.max {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        };
        match self.round_to {
            Some(step) if step > 1 => {
                // Innermost multiples of `step` inside the range
                let low = -(-self.min).div_euclid(step) * step;
                let high = self.max.div_euclid(step) * step;
                if low > high {
                    return raw;
                }
                let rounded = (raw as f64 / step as f64).round() as i64 * step;
                rounded.clamp(low, high)
            }
            _ => raw,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    pub min: f64,
    pub max: f64,
}

impl FloatRange {
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.min == self.max {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }
}

/// Realistic values used instead of random draws for some categories.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FixedValues {
    pub field_size: u32,
    pub purse: i64,
    pub prestige: f64,
}

/// Defaults shared by every tournament of one category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryDefaults {
    /// Category to inherit the qualification list from
    #[serde(default)]
    pub base: Option<String>,
    pub field_size: IntRange,
    pub purse: IntRange,
    pub prestige: FloatRange,
    pub cut_line: CutLine,
    pub points: PointsSpec,
    #[serde(default)]
    pub qualification_methods: Option<Vec<String>>,
    #[serde(default)]
    pub fixed: Option<FixedValues>,
}

/// Per-tournament values layered over a category's defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TournamentOverride {
    pub category: String,
    #[serde(default)]
    pub field_size: Option<u32>,
    #[serde(default)]
    pub purse: Option<i64>,
    #[serde(default)]
    pub prestige: Option<f64>,
    #[serde(default)]
    pub cut_line: Option<CutLine>,
    #[serde(default)]
    pub points: Option<PointsSpec>,
    #[serde(default)]
    pub qualification_methods: Option<Vec<String>>,
}

impl TournamentOverride {
    pub fn new(category: impl Into<String>) -> Self {
        TournamentOverride {
            category: category.into(),
            ..Default::default()
        }
    }
}

/// Substring rule mapping tournament names to a category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub category: String,
    pub keywords: Vec<String>,
}

/// Fully resolved configuration for one tournament.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventConfig {
    pub name: String,
    pub category: String,
    pub field_size: u32,
    pub cut_line: CutLine,
    pub purse: i64,
    pub prestige: f64,
    pub points_table: PointsTable,
    pub qualification_methods: Vec<String>,
    /// Seed that produced the randomized fields, when resolved from one
    pub seed: Option<u64>,
}

/// Event-type definitions and per-tournament overrides.
///
/// Read-only once built, so one catalog can back any number of engines.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventCatalog {
    categories: HashMap<String, CategoryDefaults>,
    #[serde(default)]
    overrides: HashMap<String, TournamentOverride>,
    #[serde(default)]
    keywords: Vec<KeywordRule>,
}

impl EventCatalog {
    /// Catalog shipped with the crate
    pub fn builtin() -> ConfigResult<Self> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let catalog: EventCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read a catalog from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Check every category reference and range up front.
    pub fn validate(&self) -> ConfigResult<()> {
        for (key, defaults) in &self.categories {
            check_int_range(key, "field_size", &defaults.field_size)?;
            check_int_range(key, "purse", &defaults.purse)?;
            if defaults.prestige.min > defaults.prestige.max {
                return Err(ConfigError::InvalidRange {
                    category: key.clone(),
                    field: "prestige",
                    min: defaults.prestige.min,
                    max: defaults.prestige.max,
                });
            }
            if let Some(base) = &defaults.base {
                self.category(base)?;
            }
            self.qualification_methods_of(key)?;
        }
        for ovr in self.overrides.values() {
            self.category(&ovr.category)?;
        }
        for rule in &self.keywords {
            self.category(&rule.category)?;
        }
        Ok(())
    }

    /// Add or replace the override for a tournament.
    pub fn add_override(&mut self, name: &str, ovr: TournamentOverride) -> ConfigResult<()> {
        self.category(&ovr.category)?;
        self.overrides.insert(name.to_string(), ovr);
        Ok(())
    }

    pub fn remove_override(&mut self, name: &str) -> Option<TournamentOverride> {
        self.overrides.remove(name)
    }

    pub fn get_override(&self, name: &str) -> Option<&TournamentOverride> {
        self.overrides.get(name)
    }

    pub fn category(&self, key: &str) -> ConfigResult<&CategoryDefaults> {
        self.categories
            .get(key)
            .ok_or_else(|| ConfigError::UnknownCategory(key.to_string()))
    }

    /// Category key for a tournament name.
    ///
    /// An exact override wins; otherwise the first keyword rule whose
    /// keyword appears in the name (case-insensitive).
    pub fn classify(&self, name: &str) -> ConfigResult<&str> {
        let key = if let Some(ovr) = self.overrides.get(name) {
            ovr.category.as_str()
        } else {
            let lowered = name.to_lowercase();
            self.keywords
                .iter()
                .find(|rule| {
                    rule.keywords
                        .iter()
                        .any(|kw| lowered.contains(&kw.to_lowercase()))
                })
                .map(|rule| rule.category.as_str())
                .unwrap_or(DEFAULT_CATEGORY)
        };
        // Fail closed on keys that point nowhere
        self.category(key)?;
        Ok(key)
    }

    /// Resolve a tournament using the caller's random source.
    pub fn resolve<R: Rng>(&self, name: &str, rng: &mut R) -> ConfigResult<EventConfig> {
        let category = self.classify(name)?;
        let defaults = self.category(category)?;
        let qualification_methods = self.qualification_methods_of(category)?;

        let config = match self.overrides.get(name) {
            Some(ovr) => EventConfig {
                name: name.to_string(),
                category: category.to_string(),
                field_size: match ovr.field_size {
                    Some(size) => size,
                    None => to_field_size(defaults.field_size.sample(rng)),
                },
                cut_line: ovr.cut_line.unwrap_or(defaults.cut_line),
                purse: match ovr.purse {
                    Some(purse) => purse,
                    None => defaults.purse.sample(rng),
                },
                prestige: match ovr.prestige {
                    Some(prestige) => prestige,
                    None => defaults.prestige.sample(rng),
                },
                points_table: ovr.points.as_ref().unwrap_or(&defaults.points).build(),
                qualification_methods: ovr
                    .qualification_methods
                    .clone()
                    .unwrap_or(qualification_methods),
                seed: None,
            },
            None => {
                let (field_size, purse, prestige) = match defaults.fixed {
                    Some(fixed) => (fixed.field_size, fixed.purse, fixed.prestige),
                    None => (
                        to_field_size(defaults.field_size.sample(rng)),
                        defaults.purse.sample(rng),
                        defaults.prestige.sample(rng),
                    ),
                };
                EventConfig {
                    name: name.to_string(),
                    category: category.to_string(),
                    field_size,
                    cut_line: defaults.cut_line,
                    purse,
                    prestige,
                    points_table: defaults.points.build(),
                    qualification_methods,
                    seed: None,
                }
            }
        };

        debug!(
            "Resolved '{}' as {} (field {}, purse {}, prestige {:.3})",
            config.name, config.category, config.field_size, config.purse, config.prestige
        );
        Ok(config)
    }

    /// Resolve a tournament from a recorded seed.
    ///
    /// With no seed one is drawn from entropy; either way it is stored on the
    /// returned config so the draw can be replayed.
    pub fn resolve_seeded(&self, name: &str, seed: Option<u64>) -> ConfigResult<EventConfig> {
        let seed = match seed {
            Some(s) => s,
            None => ChaCha8Rng::from_entropy().gen::<u64>(),
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut config = self.resolve(name, &mut rng)?;
        config.seed = Some(seed);
        Ok(config)
    }

    /// Points table for a tournament. Never draws random values.
    pub fn points_table_for(&self, name: &str) -> ConfigResult<PointsTable> {
        let category = self.classify(name)?;
        let defaults = self.category(category)?;
        let spec = self
            .overrides
            .get(name)
            .and_then(|ovr| ovr.points.as_ref())
            .unwrap_or(&defaults.points);
        Ok(spec.build())
    }

    /// Qualification list of a category, walking `base` links when unset.
    fn qualification_methods_of(&self, key: &str) -> ConfigResult<Vec<String>> {
        let mut current = key;
        for _ in 0..=self.categories.len() {
            let defaults = self.category(current)?;
            if let Some(methods) = &defaults.qualification_methods {
                return Ok(methods.clone());
            }
            match &defaults.base {
                Some(base) => current = base,
                None => return Ok(Vec::new()),
            }
        }
        Err(ConfigError::CyclicBase(key.to_string()))
    }

    pub fn category_keys(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }
}

fn check_int_range(category: &str, field: &'static str, range: &IntRange) -> ConfigResult<()> {
    if range.min < 0 || range.min > range.max {
        return Err(ConfigError::InvalidRange {
            category: category.to_string(),
            field,
            min: range.min as f64,
            max: range.max as f64,
        });
    }
    Ok(())
}

fn to_field_size(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> EventCatalog {
        EventCatalog::builtin().expect("builtin catalog parses")
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = catalog();
        for key in ["standard", "major", "invitational", "signature", "opposite_field"] {
            assert!(catalog.category(key).is_ok(), "missing category {}", key);
        }
    }

    #[test]
    fn test_classify_by_override_and_keyword() {
        let catalog = catalog();
        assert_eq!(catalog.classify("The Masters").unwrap(), "major");
        assert_eq!(catalog.classify("The Players Championship").unwrap(), "signature");
        assert_eq!(catalog.classify("Senior PGA Championship").unwrap(), "major");
        assert_eq!(catalog.classify("The Memorial Tournament").unwrap(), "invitational");
        assert_eq!(catalog.classify("Puerto Rico Open").unwrap(), "opposite_field");
        assert_eq!(catalog.classify("Sony Open in Hawaii").unwrap(), "standard");
    }

    #[test]
    fn test_override_fields_win() {
        let catalog = catalog();
        let config = catalog.resolve_seeded("The Masters", Some(7)).unwrap();
        assert_eq!(config.category, "major");
        assert_eq!(config.field_size, 89);
        assert_eq!(config.purse, 21_000_000);
        assert_eq!(config.prestige, 1.0);
        assert_eq!(config.cut_line, CutLine::Position(50));
        assert!(config.qualification_methods.contains(&"amateur_champion".to_string()));
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_unset_override_fields_are_randomized_in_range() {
        let catalog = catalog();
        let range = catalog.category("major").unwrap().field_size;
        for seed in 0..50 {
            let config = catalog.resolve_seeded("PGA Championship", Some(seed)).unwrap();
            assert_eq!(config.purse, 18_500_000);
            let size = i64::from(config.field_size);
            assert!(size >= range.min && size <= range.max);
            assert_eq!(config.field_size % 6, 0);
        }
    }

    #[test]
    fn test_keyword_major_uses_fixed_values() {
        let catalog = catalog();
        let config = catalog.resolve_seeded("Senior PGA Championship", Some(1)).unwrap();
        assert_eq!(config.field_size, 156);
        assert_eq!(config.purse, 18_500_000);
        assert_eq!(config.prestige, 1.0);
    }

    #[test]
    fn test_randomized_standard_values_stay_in_range() {
        let catalog = catalog();
        let defaults = catalog.category("standard").unwrap().clone();
        for seed in 0..100 {
            let config = catalog.resolve_seeded("Sony Open in Hawaii", Some(seed)).unwrap();
            assert!(config.purse >= defaults.purse.min && config.purse <= defaults.purse.max);
            assert_eq!(config.purse % 100_000, 0);
            assert!(config.prestige >= defaults.prestige.min && config.prestige <= defaults.prestige.max);
            assert!(config.field_size >= 120 && config.field_size <= 156);
        }
    }

    #[test]
    fn test_rounded_sample_stays_on_step_inside_range() {
        let range = IntRange {
            min: 121,
            max: 157,
            round_to: Some(10),
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let value = range.sample(&mut rng);
            assert_eq!(value % 10, 0, "{} is off the step", value);
            assert!((130..=150).contains(&value), "{} left the range", value);
        }

        // No multiple fits, so the raw draw is kept
        let narrow = IntRange {
            min: 121,
            max: 125,
            round_to: Some(10),
        };
        for _ in 0..50 {
            assert!((121..=125).contains(&narrow.sample(&mut rng)));
        }
    }

    #[test]
    fn test_seeded_resolution_is_reproducible() {
        let catalog = catalog();
        let first = catalog.resolve_seeded("Sony Open in Hawaii", Some(42)).unwrap();
        let second = catalog.resolve_seeded("Sony Open in Hawaii", Some(42)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_entropy_seed_is_recorded_and_replays() {
        let catalog = catalog();
        let first = catalog.resolve_seeded("Sony Open in Hawaii", None).unwrap();
        let seed = first.seed.expect("seed recorded");
        let replay = catalog.resolve_seeded("Sony Open in Hawaii", Some(seed)).unwrap();
        assert_eq!(first, replay);
    }

    #[test]
    fn test_qualification_methods_fall_back_to_base() {
        let catalog = catalog();
        let config = catalog.resolve_seeded("Puerto Rico Open", Some(3)).unwrap();
        let base = catalog
            .category("standard")
            .unwrap()
            .qualification_methods
            .clone()
            .unwrap();
        assert_eq!(config.qualification_methods, base);
    }

    #[test]
    fn test_unknown_category_is_fatal() {
        let mut catalog = catalog();
        let err = catalog
            .add_override("Made Up Classic", TournamentOverride::new("exhibition"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownCategory(ref key) if key == "exhibition"));

        let json = r#"{
            "categories": {},
            "overrides": { "Lone Event": { "category": "ghost" } }
        }"#;
        assert!(matches!(
            EventCatalog::from_json_str(json),
            Err(ConfigError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_missing_default_category_is_fatal() {
        let json = r#"{
            "categories": {
                "major": {
                    "field_size": { "min": 150, "max": 156 },
                    "purse": { "min": 1, "max": 2 },
                    "prestige": { "min": 1.0, "max": 1.0 },
                    "cut_line": { "type": "none" },
                    "points": { "shape": "granular", "winner": 750.0, "made_cut": 4.0 }
                }
            }
        }"#;
        let catalog = EventCatalog::from_json_str(json).unwrap();
        assert!(matches!(
            catalog.resolve_seeded("Sony Open", Some(1)),
            Err(ConfigError::UnknownCategory(ref key)) if key == DEFAULT_CATEGORY
        ));
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let json = r#"{
            "categories": {
                "standard": {
                    "field_size": { "min": 156, "max": 120 },
                    "purse": { "min": 1, "max": 2 },
                    "prestige": { "min": 0.5, "max": 0.5 },
                    "cut_line": { "type": "position", "value": 65 },
                    "points": { "shape": "granular", "winner": 500.0, "made_cut": 2.5 }
                }
            }
        }"#;
        assert!(matches!(
            EventCatalog::from_json_str(json),
            Err(ConfigError::InvalidRange { field: "field_size", .. })
        ));
    }

    #[test]
    fn test_cyclic_base_is_rejected() {
        let json = r#"{
            "categories": {
                "a": {
                    "base": "b",
                    "field_size": { "min": 1, "max": 1 },
                    "purse": { "min": 1, "max": 1 },
                    "prestige": { "min": 0.5, "max": 0.5 },
                    "cut_line": { "type": "none" },
                    "points": { "shape": "granular", "winner": 500.0, "made_cut": 2.5 }
                },
                "b": {
                    "base": "a",
                    "field_size": { "min": 1, "max": 1 },
                    "purse": { "min": 1, "max": 1 },
                    "prestige": { "min": 0.5, "max": 0.5 },
                    "cut_line": { "type": "none" },
                    "points": { "shape": "granular", "winner": 500.0, "made_cut": 2.5 }
                }
            }
        }"#;
        assert!(matches!(
            EventCatalog::from_json_str(json),
            Err(ConfigError::CyclicBase(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        assert!(matches!(
            EventCatalog::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_cut_line_serde_shape() {
        let none: CutLine = serde_json::from_str(r#"{"type":"none"}"#).unwrap();
        assert_eq!(none, CutLine::None);
        let score: CutLine = serde_json::from_str(r#"{"type":"score","value":-2}"#).unwrap();
        assert_eq!(score, CutLine::Score(-2));
    }

    #[test]
    fn test_points_table_ignores_randomness() {
        let catalog = catalog();
        let table = catalog.points_table_for("Tour Championship").unwrap();
        assert_eq!(table.winner_points(), 2000.0);
        let table = catalog.points_table_for("The Masters").unwrap();
        assert!((table.winner_points() - 750.0).abs() < 1e-9);
    }
}
