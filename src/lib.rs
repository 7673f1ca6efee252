//! gemswap: swap-and-match gem puzzle engine.
//!
//! Swap two neighbouring tokens to line up three or more of a kind. Threes clear,
//! fours wipe their whole row or column, fives leave a detonator that wipes its row
//! and column when set off. Cleared cells are refilled from above and the board keeps
//! resolving until nothing lines up.

pub mod cascade;
pub mod combo;
pub mod config;
pub mod detonator;
pub mod effects;
pub mod engine;
pub mod error;
pub mod grid;
pub mod leaderboard;
pub mod matcher;
pub mod rng;
pub mod session;

pub use combo::ComboState;
pub use config::EngineConfig;
pub use engine::{ActivationReport, ActivationStatus, Engine, SwapReport, SwapStatus};
pub use error::{ConfigError, EngineError, InvalidSwap};
pub use grid::{Cell, Grid};
pub use session::Session;
