//! Error types for the engine.

use thiserror::Error;

/// Reasons a swap is refused. Never fatal: the grid is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidSwap {
    #[error("cannot swap a cell with itself")]
    SameCell,
    #[error("cell {0} is off the board")]
    OutOfBounds(usize),
    #[error("cells {0} and {1} are not neighbours")]
    NotAdjacent(usize, usize),
    #[error("detonators cannot be swapped")]
    Detonator,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board size {0} out of range ({min}..={max})", min = crate::config::MIN_SIZE, max = crate::config::MAX_SIZE)]
    Size(usize),
    #[error("token kinds {0} out of range ({min}..={max})", min = crate::config::MIN_KINDS, max = crate::config::MAX_KINDS)]
    Kinds(u8),
    #[error("{size}x{size} board needs at least {min} token kinds, got {kinds}", min = crate::config::MIN_KINDS_LARGE)]
    KindsForSize { size: usize, kinds: u8 },
    #[error("max combo must be at least 1")]
    MaxCombo,
    #[error("cascade limit must be at least 1")]
    CascadeLimit,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("cascade did not settle within {limit} passes")]
    CascadeIterationLimitExceeded { limit: usize },
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
}
