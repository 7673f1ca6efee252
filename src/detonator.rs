//! Detonator activation: wipe the detonator's row and column in one step.

use crate::effects::ResolutionStep;
use crate::grid::Grid;

/// Clear set for activating the detonator at `index`: its full row plus its full column
/// (2N-1 cells). None when the cell is not a detonator.
pub fn blast(grid: &Grid, index: usize) -> Option<ResolutionStep> {
    if !grid.at(index)?.is_detonator() {
        return None;
    }
    let (row, col) = grid.coords(index);
    let mut step = ResolutionStep::default();
    step.cleared.extend(grid.row_indices(row));
    step.cleared.extend(grid.col_indices(col));
    Some(step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::tests::grid;

    #[test]
    fn test_blast_covers_row_and_column() {
        let g = grid(&["0123", "12*0", "2301", "3012"]);
        let i = g.index(1, 2);
        let step = blast(&g, i).unwrap();
        assert_eq!(step.cleared_count(), 2 * 4 - 1);
        assert!(step.cleared.contains(&i));
        assert!(g.row_indices(1).all(|j| step.cleared.contains(&j)));
        assert!(g.col_indices(2).all(|j| step.cleared.contains(&j)));
        assert!(step.spawns.is_empty());
    }

    #[test]
    fn test_blast_ignores_tokens() {
        let g = grid(&["0123", "12*0", "2301", "3012"]);
        assert!(blast(&g, 0).is_none());
        assert!(blast(&g, 99).is_none());
    }
}
