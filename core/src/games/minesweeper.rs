use gamehub_protocol::{
    ApiRequest, Endpoint, GameKind, MinesweeperPayload, RequestBody, WireMineCell, WireRevealState,
};
use ndarray::Array2;

use super::{cell_target, check_bounds};
use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum RevealState {
    #[default]
    Hidden,
    Revealed,
    Flagged,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct MineCell {
    pub is_mine: bool,
    pub neighbor_mines: u8,
    pub state: RevealState,
}

impl MineCell {
    fn from_wire(cell: WireMineCell) -> Result<Self> {
        if cell.neighbor_mines > 8 {
            return Err(SyncError::malformed(format!(
                "{} neighbouring mines is impossible",
                cell.neighbor_mines
            )));
        }

        Ok(Self {
            is_mine: cell.is_mine,
            neighbor_mines: cell.neighbor_mines,
            state: match cell.state {
                WireRevealState::Hidden => RevealState::Hidden,
                WireRevealState::Revealed => RevealState::Revealed,
                WireRevealState::Flagged => RevealState::Flagged,
            },
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MinesweeperAction {
    Reveal(Coord2),
    ToggleFlag(Coord2),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Minesweeper {
    board: Array2<MineCell>,
    is_end_of_game: bool,
    is_win: bool,
}

impl Minesweeper {
    pub fn from_payload(payload: MinesweeperPayload) -> Result<Self> {
        Ok(Self {
            board: board_from_rows(payload.board, |_, cell| MineCell::from_wire(cell))?,
            is_end_of_game: payload.is_end_of_game,
            is_win: payload.is_win,
        })
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    /// Panics when `coords` lies outside [`Self::size`].
    pub fn cell(&self, coords: Coord2) -> MineCell {
        self.board[coords.to_nd_index()]
    }

    pub fn is_win(&self) -> bool {
        self.is_win
    }

    pub fn mine_count(&self) -> usize {
        self.board.iter().filter(|cell| cell.is_mine).count()
    }

    pub fn flag_count(&self) -> usize {
        self.board
            .iter()
            .filter(|cell| cell.state == RevealState::Flagged)
            .count()
    }

    pub fn mines_left(&self) -> isize {
        self.mine_count() as isize - self.flag_count() as isize
    }
}

impl Reconcile for Minesweeper {}

impl Game for Minesweeper {
    const KIND: GameKind = GameKind::Minesweeper;

    type Action = MinesweeperAction;
    type StartParams = ();
    type Local = ();

    fn start_request(_params: &()) -> ApiRequest {
        ApiRequest::new(Self::KIND, Endpoint::StartGame)
    }

    fn decode(body: &str) -> Result<Self> {
        Self::from_payload(decode_json(body)?)
    }

    fn is_end_of_game(&self) -> bool {
        self.is_end_of_game
    }

    fn plan(&self, action: &MinesweeperAction) -> Result<Plan<Self>> {
        use MinesweeperAction::*;

        let (endpoint, coords) = match *action {
            Reveal(coords) => {
                let coords = check_bounds(&self.board, coords)?;
                if self.cell(coords).state != RevealState::Hidden {
                    return Err(MoveRejection::CellNotHidden.into());
                }
                (Endpoint::PlayTurn, coords)
            }
            ToggleFlag(coords) => {
                let coords = check_bounds(&self.board, coords)?;
                if self.cell(coords).state == RevealState::Revealed {
                    return Err(MoveRejection::AlreadyRevealed.into());
                }
                (Endpoint::Flag, coords)
            }
        };

        Ok(Plan::send(ApiRequest::with_body(
            Self::KIND,
            endpoint,
            RequestBody::Cell(cell_target(coords)),
        )))
    }
}
