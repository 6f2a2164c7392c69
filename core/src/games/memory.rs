use gamehub_protocol::{
    ApiRequest, Endpoint, GameKind, MemoryPayload, MemoryStart, MemoryTurn, RequestBody,
};

use crate::*;

/// Wire marker for a face-down card.
pub const UNKNOWN_CARD: i32 = -1;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Card {
    FaceDown,
    FaceUp(i32),
}

impl Card {
    fn from_wire(value: i32) -> Self {
        if value == UNKNOWN_CARD {
            Self::FaceDown
        } else {
            Self::FaceUp(value)
        }
    }

    pub const fn is_shown(self) -> bool {
        matches!(self, Self::FaceUp(_))
    }

    pub const fn face_value(self) -> Option<i32> {
        match self {
            Self::FaceDown => None,
            Self::FaceUp(value) => Some(value),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MemoryParams {
    pub pairs: u32,
}

impl Default for MemoryParams {
    fn default() -> Self {
        Self { pairs: 10 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MemoryAction {
    Flip(usize),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Memory {
    cards: Vec<Card>,
    moves: u32,
    is_end_of_game: bool,
    game_time: Option<String>,
}

impl Memory {
    pub fn from_payload(payload: MemoryPayload) -> Result<Self> {
        if payload.shown_cards.is_empty() {
            return Err(SyncError::malformed("memory game has no cards"));
        }

        Ok(Self {
            cards: payload.shown_cards.into_iter().map(Card::from_wire).collect(),
            moves: payload.moves,
            is_end_of_game: payload.is_end_of_game,
            game_time: payload.game_time,
        })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<Card> {
        self.cards.get(index).copied()
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Server-formatted play time, shown as is.
    pub fn game_time(&self) -> Option<&str> {
        self.game_time.as_deref()
    }

    /// Cards per row when laid out as a square-ish grid.
    pub fn grid_width(&self) -> usize {
        let len = self.cards.len();
        let mut width = len.isqrt();
        if width * width < len {
            width += 1;
        }
        width.max(1)
    }
}

impl Reconcile for Memory {}

impl Game for Memory {
    const KIND: GameKind = GameKind::Memory;

    type Action = MemoryAction;
    type StartParams = MemoryParams;
    type Local = ();

    fn start_request(params: &MemoryParams) -> ApiRequest {
        ApiRequest::with_body(
            Self::KIND,
            Endpoint::StartGame,
            RequestBody::MemoryStart(MemoryStart {
                pairs: params.pairs,
            }),
        )
    }

    fn decode(body: &str) -> Result<Self> {
        Self::from_payload(decode_json(body)?)
    }

    fn is_end_of_game(&self) -> bool {
        self.is_end_of_game
    }

    fn plan(&self, action: &MemoryAction) -> Result<Plan<Self>> {
        let MemoryAction::Flip(position) = *action;

        match self.card(position) {
            None => return Err(MoveRejection::OutOfBounds.into()),
            Some(card) if card.is_shown() => return Err(MoveRejection::CardAlreadyShown.into()),
            Some(_) => {}
        }

        let request = ApiRequest::with_body(
            Self::KIND,
            Endpoint::PlayTurn,
            RequestBody::MemoryTurn(MemoryTurn { position }),
        );
        Ok(Plan::send(request).then(FollowUp::Refetch(ApiRequest::new(
            Self::KIND,
            Endpoint::GameStatus,
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(cards: &[i32]) -> Memory {
        Memory::from_payload(MemoryPayload {
            shown_cards: cards.to_vec(),
            moves: 0,
            is_end_of_game: false,
            game_time: None,
        })
        .unwrap()
    }

    #[test]
    fn start_sends_the_pair_count() {
        let request = Memory::start_request(&MemoryParams::default());
        assert_eq!(
            request.body,
            Some(RequestBody::MemoryStart(MemoryStart { pairs: 10 }))
        );
    }

    #[test]
    fn flipping_a_face_up_card_is_rejected() {
        let state = game(&[-1, 4, -1, -1]);

        assert_eq!(
            state.plan(&MemoryAction::Flip(1)),
            Err(SyncError::Rejected(MoveRejection::CardAlreadyShown))
        );
        assert_eq!(
            state.plan(&MemoryAction::Flip(9)),
            Err(SyncError::Rejected(MoveRejection::OutOfBounds))
        );
    }

    #[test]
    fn flip_refetches_the_settled_status() {
        let plan = game(&[-1, -1]).plan(&MemoryAction::Flip(0)).unwrap();

        assert_eq!(plan.request.path(), "memory/play-turn");
        assert_eq!(plan.provisional, None);
        match plan.follow_up {
            FollowUp::Refetch(request) => assert_eq!(request.path(), "memory/game-status"),
            other => panic!("unexpected follow-up {other:?}"),
        }
    }

    #[test]
    fn grid_width_rounds_up_to_a_square() {
        assert_eq!(game(&[-1; 20]).grid_width(), 5);
        assert_eq!(game(&[-1; 16]).grid_width(), 4);
        assert_eq!(game(&[-1; 2]).grid_width(), 2);
    }

    #[test]
    fn empty_decks_are_malformed() {
        let decoded = Memory::decode(r#"{"shownCards":[],"moves":0,"isEndOfGame":false}"#);
        assert!(matches!(decoded, Err(SyncError::MalformedPayload(_))));
    }
}
