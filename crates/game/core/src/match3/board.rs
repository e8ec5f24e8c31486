use std::collections::BTreeSet;

use crate::env::PcgStream;

use super::Match3Error;

/// Closed set of gem kinds.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::EnumCount,
    strum::FromRepr,
)]
#[repr(u8)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Gem {
    Ruby,
    Sapphire,
    Emerald,
    Topaz,
    Amethyst,
}

impl Gem {
    /// Uniform draw over all kinds.
    pub fn random(rng: &mut PcgStream) -> Self {
        let index = rng.below(<Self as strum::EnumCount>::COUNT as u32) as u8;
        Self::from_repr(index).unwrap_or(Self::Ruby)
    }
}

/// Board coordinate; row 0 is the top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Orthogonal neighbours only (Manhattan distance exactly 1).
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

/// Row-major R x C matrix of gems.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Gem>,
}

impl Board {
    /// Fills every cell uniformly at random. Pre-existing matches are left in place.
    pub fn random(rows: usize, cols: usize, rng: &mut PcgStream) -> Self {
        let cells = (0..rows * cols).map(|_| Gem::random(rng)).collect();
        Self { rows, cols, cells }
    }

    /// Builds a board from explicit rows, top row first.
    ///
    /// # Errors
    ///
    /// Returns [`Match3Error::MalformedBoard`] for empty or ragged input.
    pub fn from_rows(rows: Vec<Vec<Gem>>) -> Result<Self, Match3Error> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 || rows.iter().any(|row| row.len() != cols) {
            return Err(Match3Error::MalformedBoard);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    pub fn get(&self, cell: Cell) -> Option<Gem> {
        self.contains(cell)
            .then(|| self.cells[cell.row * self.cols + cell.col])
    }

    /// Copies the board out as rows, top row first. A board without
    /// columns has no rows.
    pub fn to_rows(&self) -> Vec<Vec<Gem>> {
        if self.cols == 0 {
            return Vec::new();
        }
        self.cells.chunks(self.cols).map(<[Gem]>::to_vec).collect()
    }

    pub(crate) fn swap(&mut self, a: Cell, b: Cell) {
        let (a, b) = (a.row * self.cols + a.col, b.row * self.cols + b.col);
        self.cells.swap(a, b);
    }

    /// Every cell belonging to a horizontal or vertical run of three or more
    /// identical gems, anywhere on the board. A cell in both a horizontal and
    /// a vertical run appears once.
    pub fn find_matches(&self) -> BTreeSet<Cell> {
        let mut matches = BTreeSet::new();
        let at = |row: usize, col: usize| self.cells[row * self.cols + col];

        for row in 0..self.rows {
            for col in 0..self.cols.saturating_sub(2) {
                let gem = at(row, col);
                if gem == at(row, col + 1) && gem == at(row, col + 2) {
                    matches.extend((col..col + 3).map(|c| Cell::new(row, c)));
                }
            }
        }
        for col in 0..self.cols {
            for row in 0..self.rows.saturating_sub(2) {
                let gem = at(row, col);
                if gem == at(row + 1, col) && gem == at(row + 2, col) {
                    matches.extend((row..row + 3).map(|r| Cell::new(r, col)));
                }
            }
        }

        matches
    }

    /// Removes `cleared`, lets each column fall, then refills the exposed top
    /// cells with fresh random gems. One pass: new runs are not resolved.
    pub(crate) fn collapse(&mut self, cleared: &BTreeSet<Cell>, rng: &mut PcgStream) {
        for col in 0..self.cols {
            let survivors: Vec<Gem> = (0..self.rows)
                .filter(|&row| !cleared.contains(&Cell::new(row, col)))
                .map(|row| self.cells[row * self.cols + col])
                .collect();
            let gap = self.rows - survivors.len();

            for row in 0..gap {
                self.cells[row * self.cols + col] = Gem::random(rng);
            }
            for (offset, gem) in survivors.into_iter().enumerate() {
                self.cells[(gap + offset) * self.cols + col] = gem;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Gem::*;

    #[test]
    fn detects_crossing_runs_once() {
        let board = Board::from_rows(vec![
            vec![Ruby, Topaz, Sapphire],
            vec![Ruby, Ruby, Ruby],
            vec![Ruby, Emerald, Amethyst],
        ])
        .unwrap();

        let matches = board.find_matches();
        assert_eq!(matches.len(), 5);
        assert!(matches.contains(&Cell::new(1, 0)));
    }

    #[test]
    fn collapse_preserves_column_order() {
        let mut board = Board::from_rows(vec![
            vec![Topaz, Emerald],
            vec![Sapphire, Emerald],
            vec![Ruby, Emerald],
        ])
        .unwrap();
        let cleared: BTreeSet<Cell> = [Cell::new(2, 0)].into_iter().collect();

        board.collapse(&cleared, &mut PcgStream::new(3));

        assert_eq!(board.get(Cell::new(2, 0)), Some(Sapphire));
        assert_eq!(board.get(Cell::new(1, 0)), Some(Topaz));
        assert_eq!(board.get(Cell::new(2, 1)), Some(Emerald));
    }

    #[test]
    fn columnless_board_has_no_rows() {
        let board = Board::random(7, 0, &mut PcgStream::new(1));
        assert!(board.to_rows().is_empty());
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert_eq!(
            Board::from_rows(vec![vec![Ruby, Ruby], vec![Ruby]]),
            Err(Match3Error::MalformedBoard)
        );
    }

    #[test]
    fn adjacency_is_orthogonal() {
        let origin = Cell::new(2, 2);
        assert!(origin.is_adjacent(&Cell::new(1, 2)));
        assert!(origin.is_adjacent(&Cell::new(2, 3)));
        assert!(!origin.is_adjacent(&Cell::new(3, 3)));
        assert!(!origin.is_adjacent(&origin));
    }
}
