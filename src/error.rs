//! Error types for configuration loading and settlement.

use thiserror::Error;

/// Event configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A tournament, keyword rule or base reference names a category that does not exist
    #[error("Unknown event category '{0}'")]
    UnknownCategory(String),

    /// Catalog file could not be read
    #[error("Failed to read event catalog: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog content is not valid JSON for the expected shape
    #[error("Invalid event catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// A randomized range has its bounds reversed
    #[error("Invalid range for {field} in category '{category}': min {min} > max {max}")]
    InvalidRange {
        category: String,
        field: &'static str,
        min: f64,
        max: f64,
    },

    /// Category inheritance loops back on itself
    #[error("Category '{0}' inherits from itself")]
    CyclicBase(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settlement errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration could not be resolved
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The same player appears twice in a finishing list
    #[error("Player {0} appears more than once in the finishing list")]
    DuplicatePlayer(String),

    /// A finishing position of zero was supplied
    #[error("Player {0} has invalid finishing position 0")]
    InvalidPosition(String),
}

/// Result type for settlement operations
pub type EngineResult<T> = Result<T, EngineError>;
