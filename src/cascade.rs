//! Cascade loop: resolve runs, clear, drop, refill, and repeat until the board is stable.

use crate::combo::ComboTracker;
use crate::effects::{ResolutionStep, resolve, step_score};
use crate::error::EngineError;
use crate::grid::{Cell, Grid};
use crate::matcher::find_matches;
use crate::rng::TokenSource;
use std::time::Instant;
use tracing::{debug, warn};

/// Silent cascades (pre-game stabilisation) neither score nor touch the combo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scoring {
    Silent,
    Scored,
}

/// Everything one triggering action produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub steps: Vec<ResolutionStep>,
    pub score: u32,
}

impl CascadeReport {
    pub fn cleared(&self) -> usize {
        self.steps.iter().map(ResolutionStep::cleared_count).sum()
    }

    pub fn spawned(&self) -> usize {
        self.steps.iter().map(|s| s.spawns.len()).sum()
    }
}

#[derive(Debug)]
enum Phase {
    Resolving,
    Settling(ResolutionStep),
    Idle,
}

#[derive(Debug, Clone, Copy)]
pub struct CascadeEngine {
    limit: usize,
}

impl CascadeEngine {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Run from `Resolving` until no runs remain.
    pub fn run(
        &self,
        grid: &mut Grid,
        tokens: &mut dyn TokenSource,
        combo: &mut ComboTracker,
        scoring: Scoring,
        now: Instant,
    ) -> Result<CascadeReport, EngineError> {
        self.run_from(grid, tokens, combo, scoring, now, None)
    }

    /// Like [`CascadeEngine::run`], but when `first` is given it is settled before any detection.
    /// Used for detonator blasts, whose clear set does not come from runs.
    pub fn run_from(
        &self,
        grid: &mut Grid,
        tokens: &mut dyn TokenSource,
        combo: &mut ComboTracker,
        scoring: Scoring,
        now: Instant,
        first: Option<ResolutionStep>,
    ) -> Result<CascadeReport, EngineError> {
        let mut report = CascadeReport::default();
        let mut cycles = 0usize;
        let mut phase = first.map_or(Phase::Resolving, Phase::Settling);

        loop {
            phase = match phase {
                Phase::Resolving => {
                    let matches = find_matches(grid);
                    if matches.is_empty() {
                        Phase::Idle
                    } else {
                        if cycles == self.limit {
                            warn!(limit = self.limit, "cascade did not settle");
                            return Err(EngineError::CascadeIterationLimitExceeded {
                                limit: self.limit,
                            });
                        }
                        cycles += 1;
                        Phase::Settling(resolve(grid, &matches))
                    }
                }
                Phase::Settling(mut step) => {
                    if scoring == Scoring::Scored {
                        let level = combo.bump(now);
                        step.score = step_score(step.cleared_count(), level);
                        report.score += step.score;
                    }
                    apply_step(grid, &step);
                    grid.apply_gravity();
                    let refilled = grid.refill(tokens);
                    debug!(
                        cleared = step.cleared_count(),
                        spawned = step.spawns.len(),
                        refilled,
                        score = step.score,
                        "cascade step"
                    );
                    report.steps.push(step);
                    Phase::Resolving
                }
                Phase::Idle => return Ok(report),
            };
        }
    }
}

/// Empty the cleared cells and place detonators on the spawn sites.
pub fn apply_step(grid: &mut Grid, step: &ResolutionStep) {
    for &i in &step.cleared {
        grid.set_at(i, Cell::Empty);
    }
    for &i in &step.spawns {
        grid.set_at(i, Cell::Detonator);
    }
}
