//! Engine: owns the live board and exposes the player actions (swap, detonate) and setup.

use crate::cascade::{CascadeEngine, CascadeReport, Scoring};
use crate::combo::{ComboState, ComboTracker};
use crate::config::EngineConfig;
use crate::detonator;
use crate::error::{EngineError, InvalidSwap};
use crate::grid::Grid;
use crate::matcher::has_match;
use crate::rng::{RandomTokens, TokenSource};
use std::time::Instant;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapStatus {
    /// Refused before touching the board.
    Rejected(InvalidSwap),
    /// Legal swap that formed no run; the board was swapped back.
    Reverted,
    /// Swap formed a run and the cascade ran to a stable board.
    Cascaded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapReport {
    pub status: SwapStatus,
    pub score_delta: u32,
    pub combo: ComboState,
    pub grid: Grid,
    pub cascade: CascadeReport,
}

impl SwapReport {
    pub fn accepted(&self) -> bool {
        !matches!(self.status, SwapStatus::Rejected(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationStatus {
    /// Target was not a detonator; nothing happened.
    Ignored,
    Detonated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationReport {
    pub status: ActivationStatus,
    pub score_delta: u32,
    pub combo: ComboState,
    pub grid: Grid,
    pub cascade: CascadeReport,
}

/// Board, token source and combo state for one game. Actions are processed one at a
/// time, each to a stable board, before the call returns.
#[derive(Debug)]
pub struct Engine<T: TokenSource = RandomTokens> {
    config: EngineConfig,
    grid: Grid,
    tokens: T,
    combo: ComboTracker,
    cascade: CascadeEngine,
}

impl Engine<RandomTokens> {
    /// Fresh random board, silently stabilised. `seed` makes the whole game reproducible.
    #[instrument]
    pub fn initialize(config: EngineConfig, seed: Option<u64>) -> Result<Self, EngineError> {
        let tokens = match seed {
            Some(s) => RandomTokens::seeded(s, config.kinds),
            None => RandomTokens::from_entropy(config.kinds),
        };
        info!(seed = tokens.seed(), size = config.size, kinds = config.kinds, "new board");
        Self::with_tokens(config, tokens)
    }

    pub fn seed(&self) -> u64 {
        self.tokens.seed()
    }
}

impl<T: TokenSource> Engine<T> {
    /// Fill a fresh board from `tokens` and stabilise it without scoring.
    pub fn with_tokens(config: EngineConfig, mut tokens: T) -> Result<Self, EngineError> {
        config.validate()?;
        let mut grid = Grid::new(config.size);
        grid.refill(&mut tokens);
        let mut engine = Self::assemble(config, grid, tokens);
        let now = Instant::now();
        let report = engine.cascade.run(
            &mut engine.grid,
            &mut engine.tokens,
            &mut engine.combo,
            Scoring::Silent,
            now,
        )?;
        debug!(passes = report.steps.len(), "board stabilised");
        Ok(engine)
    }

    /// Adopt an existing board as-is (no stabilisation). The config's size follows the grid.
    pub fn from_grid(mut config: EngineConfig, grid: Grid, tokens: T) -> Result<Self, EngineError> {
        config.size = grid.size();
        config.validate()?;
        Ok(Self::assemble(config, grid, tokens))
    }

    fn assemble(config: EngineConfig, grid: Grid, tokens: T) -> Self {
        Self {
            combo: ComboTracker::new(config.max_combo, config.combo_timeout),
            cascade: CascadeEngine::new(config.cascade_limit),
            config,
            grid,
            tokens,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn combo(&self, now: Instant) -> ComboState {
        self.combo.state(now)
    }

    pub fn combo_tracker(&self) -> &ComboTracker {
        &self.combo
    }

    pub fn reset_combo(&mut self) {
        self.combo.reset();
    }

    /// Swap two neighbouring cells. Rejected swaps leave the board untouched; swaps that
    /// form no run are undone; otherwise the cascade runs to a stable board.
    #[instrument(skip(self), level = "debug")]
    pub fn apply_swap(&mut self, a: usize, b: usize, now: Instant) -> Result<SwapReport, EngineError> {
        if let Err(reason) = self.check_swap(a, b) {
            debug!(%reason, "swap rejected");
            return Ok(self.swap_report(SwapStatus::Rejected(reason), CascadeReport::default(), now));
        }

        self.grid.swap(a, b);
        if !has_match(&self.grid) {
            self.grid.swap(a, b);
            return Ok(self.swap_report(SwapStatus::Reverted, CascadeReport::default(), now));
        }

        let cascade = self.cascade.run(
            &mut self.grid,
            &mut self.tokens,
            &mut self.combo,
            Scoring::Scored,
            now,
        )?;
        debug!(steps = cascade.steps.len(), score = cascade.score, "swap resolved");
        Ok(self.swap_report(SwapStatus::Cascaded, cascade, now))
    }

    /// Set off the detonator at `index`. Anything else is ignored.
    #[instrument(skip(self), level = "debug")]
    pub fn activate_detonator(
        &mut self,
        index: usize,
        now: Instant,
    ) -> Result<ActivationReport, EngineError> {
        let Some(step) = detonator::blast(&self.grid, index) else {
            return Ok(self.activation_report(
                ActivationStatus::Ignored,
                CascadeReport::default(),
                now,
            ));
        };
        let cascade = self.cascade.run_from(
            &mut self.grid,
            &mut self.tokens,
            &mut self.combo,
            Scoring::Scored,
            now,
            Some(step),
        )?;
        debug!(steps = cascade.steps.len(), score = cascade.score, "detonation resolved");
        Ok(self.activation_report(ActivationStatus::Detonated, cascade, now))
    }

    /// Score and settle whatever runs the board currently holds. A no-op on a stable board.
    pub fn resolve(&mut self, now: Instant) -> Result<CascadeReport, EngineError> {
        self.cascade.run(
            &mut self.grid,
            &mut self.tokens,
            &mut self.combo,
            Scoring::Scored,
            now,
        )
    }

    fn check_swap(&self, a: usize, b: usize) -> Result<(), InvalidSwap> {
        if a == b {
            return Err(InvalidSwap::SameCell);
        }
        for i in [a, b] {
            if !self.grid.in_bounds(i) {
                return Err(InvalidSwap::OutOfBounds(i));
            }
        }
        if !self.grid.is_adjacent(a, b) {
            return Err(InvalidSwap::NotAdjacent(a, b));
        }
        let detonator_end = [a, b]
            .iter()
            .any(|&i| self.grid.at(i).is_some_and(|c| c.is_detonator()));
        if detonator_end {
            return Err(InvalidSwap::Detonator);
        }
        Ok(())
    }

    fn swap_report(&self, status: SwapStatus, cascade: CascadeReport, now: Instant) -> SwapReport {
        SwapReport {
            status,
            score_delta: cascade.score,
            combo: self.combo.state(now),
            grid: self.grid.clone(),
            cascade,
        }
    }

    fn activation_report(
        &self,
        status: ActivationStatus,
        cascade: CascadeReport,
        now: Instant,
    ) -> ActivationReport {
        ActivationReport {
            status,
            score_delta: cascade.score,
            combo: self.combo.state(now),
            grid: self.grid.clone(),
            cascade,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MAX_KINDS, MAX_SIZE, MIN_KINDS, MIN_SIZE};
    use crate::grid::Cell;
    use crate::grid::tests::grid;
    use crate::matcher::find_matches;
    use crate::rng::ScriptedTokens;
    use std::time::Duration;

    fn board8(first_row: &str) -> Grid {
        let mut rows = vec![first_row];
        rows.extend([
            "23012301", "01230123", "23012301", "01230123", "23012301", "01230123", "23012301",
        ]);
        grid(&rows)
    }

    fn engine(g: Grid, script: Vec<u8>) -> Engine<ScriptedTokens> {
        Engine::from_grid(EngineConfig::default(), g, ScriptedTokens::new(script)).unwrap()
    }

    #[test]
    fn test_initialize_is_stable() {
        for seed in 0..20 {
            let e = Engine::initialize(EngineConfig::default(), Some(seed)).unwrap();
            assert!(find_matches(e.grid()).is_empty(), "seed {seed}");
            assert_eq!(e.grid().count(|c| c == Cell::Empty), 0);
            assert_eq!(e.combo(Instant::now()).count, 0);
        }
    }

    #[test]
    fn test_every_accepted_config_settles() {
        for size in MIN_SIZE..=MAX_SIZE {
            for kinds in MIN_KINDS..=MAX_KINDS {
                let cfg = EngineConfig {
                    size,
                    kinds,
                    ..EngineConfig::default()
                };
                if cfg.validate().is_err() {
                    continue;
                }
                for seed in 0..25 {
                    let e = Engine::initialize(cfg.clone(), Some(seed));
                    assert!(e.is_ok(), "size {size} kinds {kinds} seed {seed}");
                }
            }
        }
    }

    #[test]
    fn test_initialize_same_seed_same_board() {
        let a = Engine::initialize(EngineConfig::default(), Some(99)).unwrap();
        let b = Engine::initialize(EngineConfig::default(), Some(99)).unwrap();
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.seed(), 99);
    }

    #[test]
    fn test_initialize_rejects_bad_config() {
        let cfg = EngineConfig {
            kinds: 9,
            ..EngineConfig::default()
        };
        assert!(matches!(
            Engine::initialize(cfg, Some(1)),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn test_resolve_preset_three() {
        let mut e = engine(board8("11123012"), vec![3, 2, 3]);
        let now = Instant::now();
        let report = e.resolve(now).unwrap();
        assert_eq!(report.steps[0].cleared.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(report.score, 40);
        assert_eq!(e.combo(now).count, 1);
    }

    #[test]
    fn test_swap_forming_three() {
        let g = grid(&[
            "11032301", "23112301", "01230123", "23012301", "01230123", "23012301",
            "01230123", "23012301",
        ]);
        let mut e = engine(g, vec![0, 3, 2]);
        let now = Instant::now();
        let report = e.apply_swap(2, 10, now).unwrap();
        assert_eq!(report.status, SwapStatus::Cascaded);
        assert_eq!(report.cascade.steps.len(), 1);
        assert_eq!(report.score_delta, 40);
        assert_eq!(report.combo, ComboState { count: 1, active: true });
        assert_eq!(&report.grid, e.grid());
        assert!(find_matches(&report.grid).is_empty());
    }

    #[test]
    fn test_swap_without_match_is_reverted() {
        let g = board8("01230123");
        let mut e = engine(g.clone(), vec![0]);
        let report = e.apply_swap(0, 1, Instant::now()).unwrap();
        assert_eq!(report.status, SwapStatus::Reverted);
        assert!(report.accepted());
        assert_eq!(report.score_delta, 0);
        assert_eq!(e.grid(), &g);
    }

    #[test]
    fn test_swap_rejections() {
        let mut g = board8("01230123");
        g.set(0, 4, Cell::Detonator);
        let mut e = engine(g.clone(), vec![0]);
        let now = Instant::now();
        let status = |r: SwapReport| r.status;
        assert_eq!(
            status(e.apply_swap(3, 3, now).unwrap()),
            SwapStatus::Rejected(InvalidSwap::SameCell)
        );
        assert_eq!(
            status(e.apply_swap(7, 8, now).unwrap()),
            SwapStatus::Rejected(InvalidSwap::NotAdjacent(7, 8))
        );
        assert_eq!(
            status(e.apply_swap(63, 64, now).unwrap()),
            SwapStatus::Rejected(InvalidSwap::OutOfBounds(64))
        );
        let r = e.apply_swap(3, 4, now).unwrap();
        assert_eq!(r.status, SwapStatus::Rejected(InvalidSwap::Detonator));
        assert!(!r.accepted());
        assert_eq!(e.grid(), &g);
    }

    #[test]
    fn test_detonator_activation() {
        let mut g = board8("01230123");
        let i = g.index(3, 5);
        g.set_at(i, Cell::Detonator);
        // Row 0 first, then column 5 from row 1 down; this refill leaves no runs.
        let mut e = engine(g, vec![0, 1, 2, 3, 1, 0, 3, 2, 2, 3, 0, 1, 3, 2, 1]);
        let now = Instant::now();
        let report = e.activate_detonator(i, now).unwrap();
        assert_eq!(report.status, ActivationStatus::Detonated);
        assert_eq!(report.cascade.steps.len(), 1);
        assert_eq!(report.cascade.steps[0].cleared_count(), 15);
        assert_eq!(report.score_delta, 15 * 10 + 10);
        assert_eq!(report.combo.count, 1);
        assert!(e.grid().at(i).is_some_and(|c| c.kind().is_some()));
        assert!(find_matches(e.grid()).is_empty());
    }

    #[test]
    fn test_activating_token_is_ignored() {
        let g = board8("01230123");
        let mut e = engine(g.clone(), vec![0]);
        let report = e.activate_detonator(5, Instant::now()).unwrap();
        assert_eq!(report.status, ActivationStatus::Ignored);
        assert_eq!(report.score_delta, 0);
        assert_eq!(e.grid(), &g);
    }

    #[test]
    fn test_combo_expires_between_actions() {
        let mut e = engine(board8("11123012"), vec![3, 2, 3]);
        let t0 = Instant::now();
        e.resolve(t0).unwrap();
        assert_eq!(e.combo(t0 + Duration::from_millis(4999)).count, 1);
        assert_eq!(e.combo(t0 + Duration::from_millis(5000)).count, 0);
    }
}
