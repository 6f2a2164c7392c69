pub use memory::*;
pub use minesweeper::*;
pub use sudoku::*;
pub use three_in_a_row::*;
pub use word_search::*;

mod memory;
mod minesweeper;
mod sudoku;
mod three_in_a_row;
mod word_search;

use crate::*;

fn check_bounds(board: &impl BoardExt, coords: Coord2) -> Result<Coord2> {
    if board.in_bounds(coords) {
        Ok(coords)
    } else {
        Err(MoveRejection::OutOfBounds.into())
    }
}

fn cell_target((row, col): Coord2) -> gamehub_protocol::CellTarget {
    gamehub_protocol::CellTarget {
        row: row.into(),
        col: col.into(),
    }
}
