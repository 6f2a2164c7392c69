use serde::{Deserialize, Serialize};

/// `[row, col]` pairs used by winning boxes and found coordinates.
pub type WireCoords = [usize; 2];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeInARowPayload {
    pub board: Vec<Vec<u8>>,
    #[serde(default)]
    pub is_end_of_game: bool,
    #[serde(default)]
    pub winning_boxes: Vec<WireCoords>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryPayload {
    pub shown_cards: Vec<i32>,
    #[serde(default)]
    pub moves: u32,
    #[serde(default)]
    pub is_end_of_game: bool,
    #[serde(default)]
    pub game_time: Option<String>,
}

/// One sudoku cell as sent by the server. `null` cells arrive as `None` in
/// the surrounding `Option`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireSudokuCell {
    Value(i64),
    Object {
        #[serde(default)]
        row: Option<usize>,
        #[serde(default)]
        col: Option<usize>,
        #[serde(default)]
        value: Option<i64>,
        #[serde(default)]
        editable: Option<bool>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SudokuPayload {
    pub board: Vec<Vec<Option<WireSudokuCell>>>,
    #[serde(default)]
    pub is_end_of_game: bool,
}

/// Answer to `sudoku/validate-move`, the one action without a full state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SudokuVerdict {
    pub valid: bool,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WireRevealState {
    Hidden,
    Revealed,
    Flagged,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMineCell {
    #[serde(default)]
    pub is_mine: bool,
    #[serde(default)]
    pub neighbor_mines: u8,
    pub state: WireRevealState,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinesweeperPayload {
    pub board: Vec<Vec<WireMineCell>>,
    #[serde(default)]
    pub is_end_of_game: bool,
    #[serde(default)]
    pub is_win: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordSearchPayload {
    pub board: Vec<Vec<String>>,
    #[serde(default)]
    pub words: Vec<String>,
    #[serde(default)]
    pub found_words: Vec<String>,
    #[serde(default)]
    pub found_coords: Vec<WireCoords>,
    #[serde(default)]
    pub is_end_of_game: bool,
    #[serde(default)]
    pub is_user_winner: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sudoku_cells_accept_all_three_shapes() {
        let payload: SudokuPayload = serde_json::from_str(
            r#"{"board":[[5,null,{"row":0,"col":2,"value":3,"editable":true}]],"isEndOfGame":false}"#,
        )
        .unwrap();

        assert_eq!(payload.board[0][0], Some(WireSudokuCell::Value(5)));
        assert_eq!(payload.board[0][1], None);
        assert_eq!(
            payload.board[0][2],
            Some(WireSudokuCell::Object {
                row: Some(0),
                col: Some(2),
                value: Some(3),
                editable: Some(true),
            })
        );
    }

    #[test]
    fn missing_board_is_a_parse_error() {
        let parsed = serde_json::from_str::<MinesweeperPayload>(r#"{"isEndOfGame":false}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn mine_cell_state_uses_screaming_case() {
        let cell: WireMineCell =
            serde_json::from_str(r#"{"isMine":false,"neighborMines":2,"state":"REVEALED"}"#)
                .unwrap();
        assert_eq!(cell.state, WireRevealState::Revealed);
        assert_eq!(cell.neighbor_mines, 2);
    }
}
