//! Run detection: maximal straight lines of three or more same-kind tokens.

use crate::grid::{Cell, Grid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A maximal run. `start` is the leftmost (horizontal) or topmost (vertical) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub start: usize,
    pub len: usize,
    pub orientation: Orientation,
    pub kind: u8,
}

impl Run {
    /// Board index of the `i`-th cell of the run.
    #[inline]
    pub fn cell(&self, grid: &Grid, i: usize) -> usize {
        match self.orientation {
            Orientation::Horizontal => self.start + i,
            Orientation::Vertical => self.start + i * grid.size(),
        }
    }

    pub fn cells<'a>(&'a self, grid: &'a Grid) -> impl Iterator<Item = usize> + 'a {
        (0..self.len).map(move |i| self.cell(grid, i))
    }
}

/// Detector output, bucketed by length. Runs longer than five land in `fives`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matches {
    pub threes: Vec<Run>,
    pub fours: Vec<Run>,
    pub fives: Vec<Run>,
}

impl Matches {
    pub fn is_empty(&self) -> bool {
        self.threes.is_empty() && self.fours.is_empty() && self.fives.is_empty()
    }

    pub fn len(&self) -> usize {
        self.threes.len() + self.fours.len() + self.fives.len()
    }

    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.threes.iter().chain(&self.fours).chain(&self.fives)
    }

    fn push(&mut self, run: Run) {
        match run.len {
            3 => self.threes.push(run),
            4 => self.fours.push(run),
            _ => self.fives.push(run),
        }
    }
}

/// Scan rows left to right, then columns top to bottom.
pub fn find_matches(grid: &Grid) -> Matches {
    let mut out = Matches::default();
    let n = grid.size();
    for line in 0..n {
        scan_line(grid, line, Orientation::Horizontal, &mut out);
    }
    for line in 0..n {
        scan_line(grid, line, Orientation::Vertical, &mut out);
    }
    out
}

/// True if any run exists. Stops at the first three in a row.
pub fn has_match(grid: &Grid) -> bool {
    let n = grid.size();
    let kind = |row: usize, col: usize| grid.get(row, col).and_then(Cell::kind);
    let three = |a: Option<u8>, b: Option<u8>, c: Option<u8>| a.is_some() && a == b && b == c;
    (0..n).any(|line| {
        (2..n).any(|p| {
            three(kind(line, p - 2), kind(line, p - 1), kind(line, p))
                || three(kind(p - 2, line), kind(p - 1, line), kind(p, line))
        })
    })
}

fn scan_line(grid: &Grid, line: usize, orientation: Orientation, out: &mut Matches) {
    let n = grid.size();
    let at = |pos: usize| match orientation {
        Orientation::Horizontal => grid.index(line, pos),
        Orientation::Vertical => grid.index(pos, line),
    };
    let mut pos = 0;
    while pos < n {
        let Some(kind) = grid.at(at(pos)).and_then(|c| c.kind()) else {
            pos += 1;
            continue;
        };
        let mut end = pos + 1;
        while end < n && grid.at(at(end)).and_then(|c| c.kind()) == Some(kind) {
            end += 1;
        }
        let len = end - pos;
        if len >= 3 {
            out.push(Run {
                start: at(pos),
                len,
                orientation,
                kind,
            });
        }
        // Cells of this stretch are consumed for this pass.
        pos = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::tests::grid;

    #[test]
    fn test_no_runs_on_checkerboard() {
        let g = grid(&["0101", "1010", "0101", "1010"]);
        assert!(find_matches(&g).is_empty());
    }

    #[test]
    fn test_horizontal_three() {
        let g = grid(&["0001", "1230", "2301", "3012"]);
        let m = find_matches(&g);
        assert_eq!(m.threes.len(), 1);
        assert_eq!(m.threes[0].start, 0);
        assert_eq!(m.threes[0].orientation, Orientation::Horizontal);
        assert!(m.fours.is_empty() && m.fives.is_empty());
    }

    #[test]
    fn test_run_of_six_is_one_run() {
        let g = grid(&[
            "111111", "230123", "301230", "012301", "123012", "230123",
        ]);
        let m = find_matches(&g);
        assert_eq!(m.len(), 1);
        assert_eq!(m.fives[0].len, 6);
    }

    #[test]
    fn test_vertical_four() {
        let g = grid(&["0123", "0230", "0301", "0012"]);
        let m = find_matches(&g);
        assert_eq!(m.fours.len(), 1);
        let run = m.fours[0];
        assert_eq!(run.orientation, Orientation::Vertical);
        assert_eq!(run.cells(&g).collect::<Vec<_>>(), vec![0, 4, 8, 12]);
    }

    #[test]
    fn test_cross_counts_both_directions() {
        let g = grid(&["20302", "10001", "23032", "31013", "12321"]);
        let m = find_matches(&g);
        assert_eq!(m.threes.len(), 2);
        let orientations: Vec<_> = m.threes.iter().map(|r| r.orientation).collect();
        assert!(orientations.contains(&Orientation::Horizontal));
        assert!(orientations.contains(&Orientation::Vertical));
    }

    #[test]
    fn test_detonator_breaks_run() {
        let g = grid(&["00*00", "12312", "23123", "31231", "12312"]);
        assert!(!has_match(&g));
    }

    #[test]
    fn test_has_match_agrees_with_find_matches() {
        let boards: [&[&str]; 5] = [
            &["0101", "1010", "0101", "1010"],
            &["0123", "1230", "2301", "3111"],
            &["0123", "1230", "2320", "3010"],
            &["01*", "01*", "02*"],
            &["20302", "10001", "23032", "31013", "12321"],
        ];
        for rows in boards {
            let g = grid(rows);
            assert_eq!(has_match(&g), !find_matches(&g).is_empty(), "{rows:?}");
        }
        assert!(has_match(&grid(&["0123", "1230", "2301", "3111"])));
        assert!(has_match(&grid(&["0123", "1230", "2320", "3010"])));
    }

    #[test]
    fn test_empty_cells_never_match() {
        let g = grid(&["...", "...", "..."]);
        assert!(!has_match(&g));
    }
}
