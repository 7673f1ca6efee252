//! Effect resolution: which cells a set of runs clears, where detonators appear, and what it scores.

use crate::grid::Grid;
use crate::matcher::{Matches, Orientation, Run};
use std::collections::BTreeSet;

/// Points per cleared cell, and per combo level on top.
pub const POINTS_PER_CELL: u32 = 10;
pub const POINTS_PER_COMBO: u32 = 10;

/// Cell of a five-run that turns into a detonator.
pub const DETONATOR_SLOT: usize = 2;

/// One detection-and-clear pass. `score` is filled in by the cascade (0 for silent passes).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionStep {
    pub cleared: BTreeSet<usize>,
    pub spawns: BTreeSet<usize>,
    pub score: u32,
}

impl ResolutionStep {
    pub fn cleared_count(&self) -> usize {
        self.cleared.len()
    }
}

/// Turn detector output into a clear set and a spawn set.
/// Threes clear their cells, fours clear their whole line, fives clear all but
/// `DETONATOR_SLOT`, which becomes a detonator. A spawn site is never cleared.
pub fn resolve(grid: &Grid, matches: &Matches) -> ResolutionStep {
    let mut step = ResolutionStep::default();

    for run in &matches.threes {
        step.cleared.extend(run.cells(grid));
    }
    for run in &matches.fours {
        step.cleared.extend(line_of(grid, run));
    }
    for run in &matches.fives {
        let spawn = run.cell(grid, DETONATOR_SLOT);
        step.spawns.insert(spawn);
        step.cleared.extend(run.cells(grid).filter(|&i| i != spawn));
    }

    let spawns = &step.spawns;
    step.cleared.retain(|i| !spawns.contains(i));
    step
}

/// Score of one scoring step. `combo` is the combo count after this step's increment.
#[inline]
pub fn step_score(cleared: usize, combo: u32) -> u32 {
    cleared as u32 * POINTS_PER_CELL + combo * POINTS_PER_COMBO
}

fn line_of(grid: &Grid, run: &Run) -> Vec<usize> {
    let (row, col) = grid.coords(run.start);
    match run.orientation {
        Orientation::Horizontal => grid.row_indices(row).collect(),
        Orientation::Vertical => grid.col_indices(col).collect(),
    }
}
