use gamehub_protocol::{ApiRequest, Endpoint, GameKind, RequestBody, ThreeInARowPayload};
use ndarray::Array2;

use super::{cell_target, check_bounds};
use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Occupant {
    #[default]
    Empty,
    User,
    Opponent,
}

impl Occupant {
    fn from_wire(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::Empty),
            1 => Ok(Self::User),
            2 => Ok(Self::Opponent),
            other => Err(SyncError::malformed(format!("unknown occupant code {other}"))),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Draw,
    UserWon,
    OpponentWon,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ThreeInARowAction {
    Play(Coord2),
}

/// Tic-tac-toe against the server's simulated opponent.
#[derive(Clone, Debug, PartialEq)]
pub struct ThreeInARow {
    board: Array2<Occupant>,
    is_end_of_game: bool,
    winning_boxes: Vec<Coord2>,
}

impl ThreeInARow {
    pub fn from_payload(payload: ThreeInARowPayload) -> Result<Self> {
        let board = board_from_rows(payload.board, |_, code| Occupant::from_wire(code))?;
        let size = board.size();
        let winning_boxes = payload
            .winning_boxes
            .into_iter()
            .map(|coords| coords_from_wire(coords, size))
            .collect::<Result<_>>()?;

        Ok(Self {
            board,
            is_end_of_game: payload.is_end_of_game,
            winning_boxes,
        })
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    /// Panics when `coords` lies outside [`Self::size`].
    pub fn occupant(&self, coords: Coord2) -> Occupant {
        self.board[coords.to_nd_index()]
    }

    pub fn winning_boxes(&self) -> &[Coord2] {
        &self.winning_boxes
    }

    pub fn is_winning(&self, coords: Coord2) -> bool {
        self.winning_boxes.contains(&coords)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        if !self.is_end_of_game {
            return None;
        }

        Some(match self.winning_boxes.first() {
            None => Outcome::Draw,
            Some(&coords) => match self.occupant(coords) {
                Occupant::User => Outcome::UserWon,
                _ => Outcome::OpponentWon,
            },
        })
    }

    /// The board with the user's mark placed, as shown while the server answers.
    fn with_user_mark(&self, coords: Coord2) -> Self {
        let mut next = self.clone();
        next.board[coords.to_nd_index()] = Occupant::User;
        next
    }
}

impl Reconcile for ThreeInARow {}

impl Game for ThreeInARow {
    const KIND: GameKind = GameKind::ThreeInARow;

    type Action = ThreeInARowAction;
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

    fn plan(&self, action: &ThreeInARowAction) -> Result<Plan<Self>> {
        let ThreeInARowAction::Play(coords) = *action;
        let coords = check_bounds(&self.board, coords)?;

        if self.occupant(coords) != Occupant::Empty {
            return Err(MoveRejection::Occupied.into());
        }

        let request = ApiRequest::with_body(
            Self::KIND,
            Endpoint::PlayUserTurn,
            RequestBody::Cell(cell_target(coords)),
        );
        Ok(Plan::send(request)
            .with_provisional(self.with_user_mark(coords))
            .then(FollowUp::DeferApply))
    }
}
