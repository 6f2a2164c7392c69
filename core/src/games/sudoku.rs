use gamehub_protocol::{
    ApiRequest, Endpoint, GameKind, RequestBody, SudokuMove, SudokuPayload, SudokuVerdict,
    WireSudokuCell,
};
use ndarray::Array2;

use super::check_bounds;
use crate::*;

/// A sudoku value in `1..=9`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digit(u8);

impl Digit {
    pub const fn new(value: u8) -> Option<Self> {
        if 1 <= value && value <= 9 {
            Some(Self(value))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    fn from_wire(value: i64) -> Result<Self> {
        u8::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| SyncError::malformed(format!("sudoku value {value} out of range")))
    }
}

/// Normalized sudoku cell. Both wire shapes map onto this one representation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SudokuCell {
    Fixed(Digit),
    Editable(Option<Digit>),
}

impl Default for SudokuCell {
    fn default() -> Self {
        Self::Editable(None)
    }
}

impl SudokuCell {
    pub const fn value(self) -> Option<Digit> {
        match self {
            Self::Fixed(digit) => Some(digit),
            Self::Editable(value) => value,
        }
    }

    pub const fn is_fixed(self) -> bool {
        matches!(self, Self::Fixed(_))
    }

    pub const fn is_editable(self) -> bool {
        !self.is_fixed()
    }

    fn from_wire(coords: Coord2, cell: Option<WireSudokuCell>) -> Result<Self> {
        let value = |raw: Option<i64>| raw.map(Digit::from_wire).transpose();

        Ok(match cell {
            None => Self::Editable(None),
            Some(WireSudokuCell::Value(raw)) => Self::Fixed(Digit::from_wire(raw)?),
            Some(WireSudokuCell::Object {
                value: raw,
                editable,
                ..
            }) => match (value(raw)?, editable) {
                (digit, Some(true)) => Self::Editable(digit),
                (Some(digit), Some(false) | None) => Self::Fixed(digit),
                (None, None) => Self::Editable(None),
                (None, Some(false)) => {
                    log::warn!("cell {:?} is marked fixed without a value", coords);
                    Self::Editable(None)
                }
            },
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SudokuAction {
    Place { coords: Coord2, value: u8 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sudoku {
    board: Array2<SudokuCell>,
    is_end_of_game: bool,
}

impl Sudoku {
    pub fn from_payload(payload: SudokuPayload) -> Result<Self> {
        Ok(Self {
            board: board_from_rows(payload.board, SudokuCell::from_wire)?,
            is_end_of_game: payload.is_end_of_game,
        })
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    /// Panics when `coords` lies outside [`Self::size`].
    pub fn cell(&self, coords: Coord2) -> SudokuCell {
        self.board[coords.to_nd_index()]
    }

    pub fn is_fixed(&self, coords: Coord2) -> bool {
        self.cell(coords).is_fixed()
    }

    pub fn value(&self, coords: Coord2) -> Option<Digit> {
        self.cell(coords).value()
    }

    /// Applies a `validate-move` verdict. Accepted values become fixed.
    pub fn project(&self, coords: Coord2, digit: Digit, verdict: SudokuVerdict) -> Result<Self> {
        if !verdict.valid {
            return Err(SyncError::Validation(vec!["Invalid move".into()]));
        }

        let mut next = self.clone();
        next.board[coords.to_nd_index()] = SudokuCell::Fixed(digit);
        if verdict.completed {
            next.is_end_of_game = true;
        }
        Ok(next)
    }
}

/// Used when a full board arrives for an existing game; moves go through
/// [`Sudoku::project`] instead.
impl Reconcile for Sudoku {
    fn reconcile(&self, incoming: Self) -> Result<Self> {
        if incoming.board.dim() != self.board.dim() {
            return Err(SyncError::malformed(format!(
                "board shape changed from {:?} to {:?}",
                self.board.dim(),
                incoming.board.dim()
            )));
        }

        let mut merged = incoming;
        for coords in self.board.iter_coords() {
            let index = coords.to_nd_index();
            if let (SudokuCell::Fixed(previous), SudokuCell::Editable(_)) =
                (self.board[index], merged.board[index])
            {
                log::warn!("keeping fixed cell {:?} despite editable update", coords);
                merged.board[index] = SudokuCell::Fixed(previous);
            }
        }
        Ok(merged)
    }
}

impl Game for Sudoku {
    const KIND: GameKind = GameKind::Sudoku;

    type Action = SudokuAction;
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

    fn plan(&self, action: &SudokuAction) -> Result<Plan<Self>> {
        let SudokuAction::Place { coords, value } = *action;
        let coords = check_bounds(&self.board, coords)?;

        if Digit::new(value).is_none() {
            return Err(MoveRejection::DigitOutOfRange(value).into());
        }
        if self.is_fixed(coords) {
            return Err(MoveRejection::FixedCell.into());
        }

        let request = ApiRequest::with_body(
            Self::KIND,
            Endpoint::ValidateMove,
            RequestBody::SudokuMove(SudokuMove {
                row: coords.0.into(),
                col: coords.1.into(),
                value,
            }),
        );
        Ok(Plan::send(request))
    }

    fn apply_response(&self, action: &SudokuAction, body: &str) -> Result<Self> {
        let SudokuAction::Place { coords, value } = *action;
        let digit = Digit::new(value).ok_or(MoveRejection::DigitOutOfRange(value))?;
        self.project(coords, digit, decode_json(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digit(value: u8) -> Digit {
        Digit::new(value).unwrap()
    }

    fn game(json: &str) -> Sudoku {
        Sudoku::decode(json).unwrap()
    }

    #[test]
    #[should_panic]
    fn cell_outside_the_board_panics() {
        let state = game(r#"{"board":[[5,null]],"isEndOfGame":false}"#);
        state.cell((1, 0));
    }

    #[test]
    fn wire_shapes_normalize_to_one_representation() {
        let state = game(
            r#"{"board":[[5,null,{"value":3,"editable":true},{"value":7},{"value":null},{"value":2,"editable":false}]],"isEndOfGame":false}"#,
        );

        assert_eq!(state.cell((0, 0)), SudokuCell::Fixed(digit(5)));
        assert_eq!(state.cell((0, 1)), SudokuCell::Editable(None));
        assert_eq!(state.cell((0, 2)), SudokuCell::Editable(Some(digit(3))));
        assert_eq!(state.cell((0, 3)), SudokuCell::Fixed(digit(7)));
        assert_eq!(state.cell((0, 4)), SudokuCell::Editable(None));
        assert_eq!(state.cell((0, 5)), SudokuCell::Fixed(digit(2)));
    }

    #[test]
    fn out_of_range_values_are_malformed() {
        let decoded = Sudoku::decode(r#"{"board":[[10]],"isEndOfGame":false}"#);
        assert!(matches!(decoded, Err(SyncError::MalformedPayload(_))));
    }

    #[test]
    fn reconcile_never_unfixes_a_clue() {
        let previous = game(r#"{"board":[[5,null]],"isEndOfGame":false}"#);
        let incoming = game(r#"{"board":[[{"value":5,"editable":true},4]],"isEndOfGame":false}"#);

        let merged = previous.reconcile(incoming).unwrap();

        assert_eq!(merged.cell((0, 0)), SudokuCell::Fixed(digit(5)));
        assert_eq!(merged.cell((0, 1)), SudokuCell::Fixed(digit(4)));
    }

    #[test]
    fn reconcile_refuses_a_reshaped_board() {
        let previous = game(r#"{"board":[[5,null]],"isEndOfGame":false}"#);
        let incoming = game(r#"{"board":[[5],[null]],"isEndOfGame":false}"#);

        assert!(matches!(
            previous.reconcile(incoming),
            Err(SyncError::MalformedPayload(_))
        ));
    }

    #[test]
    fn plan_rejects_clues_and_bad_digits() {
        let state = game(r#"{"board":[[5,null]],"isEndOfGame":false}"#);

        assert_eq!(
            state.plan(&SudokuAction::Place {
                coords: (0, 0),
                value: 3
            }),
            Err(SyncError::Rejected(MoveRejection::FixedCell))
        );
        assert_eq!(
            state.plan(&SudokuAction::Place {
                coords: (0, 1),
                value: 0
            }),
            Err(SyncError::Rejected(MoveRejection::DigitOutOfRange(0)))
        );
        assert!(
            state
                .plan(&SudokuAction::Place {
                    coords: (0, 1),
                    value: 9
                })
                .is_ok()
        );
    }

    #[test]
    fn accepted_moves_become_fixed_and_may_complete_the_game() {
        let state = game(r#"{"board":[[5,null]],"isEndOfGame":false}"#);
        let action = SudokuAction::Place {
            coords: (0, 1),
            value: 4,
        };

        let next = state
            .apply_response(&action, r#"{"valid":true,"completed":true}"#)
            .unwrap();

        assert_eq!(next.cell((0, 1)), SudokuCell::Fixed(digit(4)));
        assert!(next.is_end_of_game());
    }

    #[test]
    fn rejected_moves_leave_the_board_alone() {
        let state = game(r#"{"board":[[5,null]],"isEndOfGame":false}"#);
        let action = SudokuAction::Place {
            coords: (0, 1),
            value: 5,
        };

        assert_eq!(
            state.apply_response(&action, r#"{"valid":false,"completed":false}"#),
            Err(SyncError::Validation(vec!["Invalid move".into()]))
        );
        assert_eq!(state.cell((0, 1)), SudokuCell::Editable(None));
    }
}
