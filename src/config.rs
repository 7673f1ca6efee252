//! Engine configuration and its limits.

use crate::combo::{DEFAULT_COMBO_TIMEOUT, DEFAULT_MAX_COMBO};
use crate::error::ConfigError;
use std::time::Duration;

pub const DEFAULT_SIZE: usize = 8;
pub const DEFAULT_KINDS: u8 = 4;
pub const DEFAULT_CASCADE_LIMIT: usize = 100;

pub const MIN_SIZE: usize = 3;
pub const MAX_SIZE: usize = 16;
/// Fewer than three kinds and a random refill may never settle.
pub const MIN_KINDS: u8 = 3;
/// Boards wider than this refill whole lines often enough that three kinds keep re-matching.
pub const LARGE_SIZE: usize = 10;
pub const MIN_KINDS_LARGE: u8 = 4;
/// Bounded by the number of token colours in the theme.
pub const MAX_KINDS: u8 = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub size: usize,
    pub kinds: u8,
    pub max_combo: u32,
    pub combo_timeout: Duration,
    /// Resolving passes allowed per action before the cascade is aborted.
    pub cascade_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            kinds: DEFAULT_KINDS,
            max_combo: DEFAULT_MAX_COMBO,
            combo_timeout: DEFAULT_COMBO_TIMEOUT,
            cascade_limit: DEFAULT_CASCADE_LIMIT,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&self.size) {
            return Err(ConfigError::Size(self.size));
        }
        if !(MIN_KINDS..=MAX_KINDS).contains(&self.kinds) {
            return Err(ConfigError::Kinds(self.kinds));
        }
        if self.size > LARGE_SIZE && self.kinds < MIN_KINDS_LARGE {
            return Err(ConfigError::KindsForSize {
                size: self.size,
                kinds: self.kinds,
            });
        }
        if self.max_combo == 0 {
            return Err(ConfigError::MaxCombo);
        }
        if self.cascade_limit == 0 {
            return Err(ConfigError::CascadeLimit);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_two_kinds() {
        let cfg = EngineConfig {
            kinds: 2,
            ..EngineConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::Kinds(2)));
    }

    #[test]
    fn test_three_kinds_only_on_small_boards() {
        let at = |size, kinds| EngineConfig {
            size,
            kinds,
            ..EngineConfig::default()
        };
        assert_eq!(at(LARGE_SIZE, 3).validate(), Ok(()));
        assert_eq!(
            at(LARGE_SIZE + 1, 3).validate(),
            Err(ConfigError::KindsForSize { size: 11, kinds: 3 })
        );
        assert_eq!(at(MAX_SIZE, MIN_KINDS_LARGE).validate(), Ok(()));
    }

    #[test]
    fn test_rejects_tiny_board() {
        let cfg = EngineConfig {
            size: 2,
            ..EngineConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Size(2))));
    }
}
