use ndarray::Array2;

use crate::{Result, SyncError};

/// Single coordinate axis used for board rows, columns and positions.
pub type Coord = u8;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

/// Chebyshev adjacency: both axis distances at most one, diagonals included.
/// A cell is not adjacent to itself.
pub const fn is_adjacent(a: Coord2, b: Coord2) -> bool {
    let d_row = a.0.abs_diff(b.0);
    let d_col = a.1.abs_diff(b.1);
    d_row <= 1 && d_col <= 1 && (d_row | d_col) != 0
}

pub trait BoardExt {
    fn size(&self) -> Coord2;

    fn in_bounds(&self, coords: Coord2) -> bool {
        let size = self.size();
        coords.0 < size.0 && coords.1 < size.1
    }

    fn iter_coords(&self) -> impl Iterator<Item = Coord2> {
        let (rows, cols) = self.size();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }
}

impl<T> BoardExt for Array2<T> {
    fn size(&self) -> Coord2 {
        let (rows, cols) = self.dim();
        // boards are only built through `board_from_rows`, which bounds both axes
        (rows as Coord, cols as Coord)
    }
}

/// Builds a rectangular board from the server's row-major nested arrays.
///
/// Empty, ragged or oversized boards are rejected as malformed, so a
/// successfully built board always has both axes within `1..=Coord::MAX`.
pub(crate) fn board_from_rows<W, T>(
    rows: Vec<Vec<W>>,
    mut convert: impl FnMut(Coord2, W) -> Result<T>,
) -> Result<Array2<T>> {
    let row_count = rows.len();
    let col_count = rows.first().map_or(0, Vec::len);

    if row_count == 0 || col_count == 0 {
        return Err(SyncError::malformed("board is empty"));
    }
    if row_count > Coord::MAX as usize || col_count > Coord::MAX as usize {
        return Err(SyncError::malformed(format!(
            "board of {row_count}x{col_count} is too large"
        )));
    }

    let mut cells = Vec::with_capacity(row_count * col_count);
    for (row_index, row) in rows.into_iter().enumerate() {
        if row.len() != col_count {
            return Err(SyncError::malformed(format!(
                "row {row_index} has {} cells, expected {col_count}",
                row.len()
            )));
        }
        for (col_index, cell) in row.into_iter().enumerate() {
            cells.push(convert((row_index as Coord, col_index as Coord), cell)?);
        }
    }

    Array2::from_shape_vec((row_count, col_count), cells)
        .map_err(|err| SyncError::malformed(err.to_string()))
}

/// Converts a wire `[row, col]` pair, checking it lies on a board of `size`.
pub(crate) fn coords_from_wire([row, col]: [usize; 2], size: Coord2) -> Result<Coord2> {
    match (Coord::try_from(row), Coord::try_from(col)) {
        (Ok(row), Ok(col)) if row < size.0 && col < size.1 => Ok((row, col)),
        _ => Err(SyncError::malformed(format!(
            "coordinates [{row}, {col}] are outside the board"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_includes_diagonals_and_excludes_self() {
        assert!(is_adjacent((1, 1), (0, 0)));
        assert!(is_adjacent((1, 1), (2, 2)));
        assert!(is_adjacent((1, 1), (1, 2)));
        assert!(!is_adjacent((1, 1), (1, 1)));
        assert!(!is_adjacent((0, 0), (2, 0)));
        assert!(!is_adjacent((0, 0), (0, 2)));
    }

    #[test]
    fn adjacency_is_symmetric_on_a_small_grid() {
        for a_row in 0..4 {
            for a_col in 0..4 {
                for b_row in 0..4 {
                    for b_col in 0..4 {
                        let a = (a_row, a_col);
                        let b = (b_row, b_col);
                        assert_eq!(is_adjacent(a, b), is_adjacent(b, a));
                    }
                }
            }
        }
    }

    #[test]
    fn board_from_rows_rejects_ragged_input() {
        let rows = vec![vec![1, 2], vec![3]];
        let board = board_from_rows(rows, |_, cell| Ok(cell));
        assert!(matches!(board, Err(SyncError::MalformedPayload(_))));
    }

    #[test]
    fn board_from_rows_keeps_row_major_order() {
        let rows = vec![vec!['c', 'a'], vec!['t', 's']];
        let board = board_from_rows(rows, |_, cell| Ok(cell)).unwrap();

        let bottom_left: Coord2 = (1, 0);
        assert_eq!(board.size(), (2, 2));
        assert_eq!(board[bottom_left.to_nd_index()], 't');
        assert_eq!(board.iter_coords().count(), 4);
    }

    #[test]
    fn wire_coordinates_must_lie_on_the_board() {
        assert_eq!(coords_from_wire([1, 2], (3, 3)), Ok((1, 2)));
        assert!(coords_from_wire([3, 0], (3, 3)).is_err());
        assert!(coords_from_wire([0, 300], (3, 3)).is_err());
    }
}
