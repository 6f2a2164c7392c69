use gamehub_protocol::{
    ApiRequest, Endpoint, GameKind, RequestBody, WordChoice, WordSearchPayload,
};
use hashbrown::HashSet;
use ndarray::Array2;

use crate::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WordSearchAction {
    SelectWord(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct WordSearch {
    board: Array2<String>,
    words: Vec<String>,
    found_words: Vec<String>,
    found_coords: HashSet<Coord2>,
    is_end_of_game: bool,
    is_user_winner: bool,
}

impl WordSearch {
    pub fn from_payload(payload: WordSearchPayload) -> Result<Self> {
        let board = board_from_rows(payload.board, |coords, letter: String| {
            if letter.is_empty() {
                Err(SyncError::malformed(format!("cell {coords:?} has no letter")))
            } else {
                Ok(letter)
            }
        })?;
        let size = board.size();
        let found_coords = payload
            .found_coords
            .into_iter()
            .map(|coords| coords_from_wire(coords, size))
            .collect::<Result<_>>()?;

        Ok(Self {
            board,
            words: payload.words,
            found_words: payload.found_words,
            found_coords,
            is_end_of_game: payload.is_end_of_game,
            is_user_winner: payload.is_user_winner,
        })
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn found_words(&self) -> &[String] {
        &self.found_words
    }

    pub fn is_word_found(&self, word: &str) -> bool {
        self.found_words.iter().any(|found| found == word)
    }

    pub fn is_found(&self, coords: Coord2) -> bool {
        self.found_coords.contains(&coords)
    }

    pub fn is_user_winner(&self) -> bool {
        self.is_user_winner
    }
}

impl LetterGrid for WordSearch {
    fn letter(&self, coords: Coord2) -> Option<&str> {
        self.board.in_bounds(coords).then(|| self.board[coords.to_nd_index()].as_str())
    }
}

impl Reconcile for WordSearch {}

impl Game for WordSearch {
    const KIND: GameKind = GameKind::WordSearch;

    type Action = WordSearchAction;
    type StartParams = ();
    type Local = PathSelection;

    fn start_request(_params: &()) -> ApiRequest {
        ApiRequest::new(Self::KIND, Endpoint::StartGame)
    }

    fn decode(body: &str) -> Result<Self> {
        Self::from_payload(decode_json(body)?)
    }

    fn is_end_of_game(&self) -> bool {
        self.is_end_of_game
    }

    fn plan(&self, action: &WordSearchAction) -> Result<Plan<Self>> {
        let WordSearchAction::SelectWord(word) = action;
        if word.is_empty() {
            return Err(MoveRejection::EmptySelection.into());
        }

        Ok(Plan::send(ApiRequest::with_body(
            Self::KIND,
            Endpoint::SelectWord,
            RequestBody::Word(WordChoice { word: word.clone() }),
        )))
    }
}
