use smallvec::SmallVec;

use crate::*;

/// Anything a path can be traced over.
pub trait LetterGrid {
    fn letter(&self, coords: Coord2) -> Option<&str>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    AlreadySelected,
    NotAdjacent,
    OutOfBounds,
    GameOver,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TapOutcome {
    Started,
    Extended,
    Ignored(IgnoreReason),
}

impl TapOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Ignored(_))
    }
}

/// Word-search selection: a continuous, non-self-intersecting path of
/// Chebyshev-adjacent cells and the word spelled along it.
///
/// An empty path is the idle state; any non-empty path is "selecting".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathSelection {
    path: SmallVec<[Coord2; 16]>,
    word: String,
}

impl PathSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.path.is_empty()
    }

    pub fn path(&self) -> &[Coord2] {
        &self.path
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.path.contains(&coords)
    }

    pub fn last(&self) -> Option<Coord2> {
        self.path.last().copied()
    }

    pub fn tap(&mut self, coords: Coord2, grid: &impl LetterGrid) -> TapOutcome {
        use IgnoreReason::*;

        let Some(letter) = grid.letter(coords) else {
            return TapOutcome::Ignored(OutOfBounds);
        };

        let outcome = match self.last() {
            None => TapOutcome::Started,
            Some(_) if self.contains(coords) => return TapOutcome::Ignored(AlreadySelected),
            Some(last) if !is_adjacent(last, coords) => return TapOutcome::Ignored(NotAdjacent),
            Some(_) => TapOutcome::Extended,
        };

        self.path.push(coords);
        self.word.push_str(letter);
        log::trace!("selection {:?} -> {:?}", self.path, self.word);
        outcome
    }

    /// Drops the path, returning the word it spelled.
    pub fn take_word(&mut self) -> String {
        self.path.clear();
        core::mem::take(&mut self.word)
    }

    pub fn clear(&mut self) {
        self.path.clear();
        self.word.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Grid(Vec<Vec<&'static str>>);

    impl LetterGrid for Grid {
        fn letter(&self, (row, col): Coord2) -> Option<&str> {
            self.0.get(row as usize)?.get(col as usize).copied()
        }
    }

    fn cats() -> Grid {
        Grid(vec![vec!["c", "a"], vec!["t", "s"]])
    }

    fn open_grid() -> Grid {
        Grid(vec![vec!["x"; 5]; 5])
    }

    #[test]
    fn traces_cast_across_a_diagonal() {
        let grid = cats();
        let mut selection = PathSelection::new();

        assert_eq!(selection.tap((0, 0), &grid), TapOutcome::Started);
        assert_eq!(selection.word(), "c");
        assert_eq!(selection.tap((0, 1), &grid), TapOutcome::Extended);
        assert_eq!(selection.word(), "ca");
        assert_eq!(selection.tap((1, 1), &grid), TapOutcome::Extended);
        assert_eq!(selection.word(), "cas");
        assert_eq!(selection.tap((1, 0), &grid), TapOutcome::Extended);
        assert_eq!(selection.word(), "cast");
        assert_eq!(selection.path(), &[(0, 0), (0, 1), (1, 1), (1, 0)]);
    }

    #[test]
    fn every_neighbor_of_the_last_cell_extends_the_path() {
        let grid = open_grid();
        for d_row in [-1i16, 0, 1] {
            for d_col in [-1i16, 0, 1] {
                if d_row == 0 && d_col == 0 {
                    continue;
                }
                let mut selection = PathSelection::new();
                selection.tap((2, 2), &grid);
                let next = ((2 + d_row) as Coord, (2 + d_col) as Coord);

                assert_eq!(selection.tap(next, &grid), TapOutcome::Extended);
                assert_eq!(selection.path().len(), 2);
            }
        }
    }

    #[test]
    fn retapping_any_selected_cell_changes_nothing() {
        let grid = open_grid();
        let mut selection = PathSelection::new();
        selection.tap((0, 0), &grid);
        selection.tap((1, 1), &grid);
        selection.tap((1, 2), &grid);
        let before = selection.clone();

        for coords in [(0, 0), (1, 1), (1, 2)] {
            assert_eq!(
                selection.tap(coords, &grid),
                TapOutcome::Ignored(IgnoreReason::AlreadySelected)
            );
        }
        assert_eq!(selection, before);
    }

    #[test]
    fn non_adjacent_taps_are_ignored() {
        let grid = open_grid();
        let mut selection = PathSelection::new();
        selection.tap((0, 0), &grid);

        assert_eq!(
            selection.tap((2, 0), &grid),
            TapOutcome::Ignored(IgnoreReason::NotAdjacent)
        );
        assert_eq!(
            selection.tap((4, 4), &grid),
            TapOutcome::Ignored(IgnoreReason::NotAdjacent)
        );
        assert_eq!(selection.path(), &[(0, 0)]);
        assert_eq!(selection.word(), "x");
    }

    #[test]
    fn adjacency_is_checked_against_the_last_cell_only() {
        let grid = open_grid();
        let mut selection = PathSelection::new();
        selection.tap((0, 0), &grid);
        selection.tap((0, 1), &grid);
        selection.tap((0, 2), &grid);

        // touches the anchor but not the tail
        assert_eq!(
            selection.tap((1, 0), &grid),
            TapOutcome::Ignored(IgnoreReason::NotAdjacent)
        );
        assert_eq!(selection.tap((1, 1), &grid), TapOutcome::Extended);
    }

    #[test]
    fn taps_outside_the_grid_are_ignored() {
        let grid = cats();
        let mut selection = PathSelection::new();

        assert_eq!(
            selection.tap((2, 0), &grid),
            TapOutcome::Ignored(IgnoreReason::OutOfBounds)
        );
        assert!(selection.is_idle());
    }

    #[test]
    fn take_word_returns_to_idle() {
        let grid = cats();
        let mut selection = PathSelection::new();
        selection.tap((1, 0), &grid);
        selection.tap((0, 1), &grid);

        assert_eq!(selection.take_word(), "ta");
        assert!(selection.is_idle());
        assert_eq!(selection.word(), "");
    }
}
