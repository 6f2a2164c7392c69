use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Games served by the hub.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    ThreeInARow,
    Memory,
    Sudoku,
    Minesweeper,
    WordSearch,
}

impl GameKind {
    pub const ALL: [GameKind; 5] = [
        Self::ThreeInARow,
        Self::Memory,
        Self::Sudoku,
        Self::Minesweeper,
        Self::WordSearch,
    ];

    /// First path segment of every route for this game.
    pub const fn route_prefix(self) -> &'static str {
        use GameKind::*;
        match self {
            ThreeInARow => "three-in-a-row",
            Memory => "memory",
            Sudoku => "sudoku",
            Minesweeper => "minesweeper",
            WordSearch => "wordsearch",
        }
    }

    pub const fn slug(self) -> &'static str {
        use GameKind::*;
        match self {
            ThreeInARow => "three-in-a-row",
            Memory => "memory",
            Sudoku => "sudoku",
            Minesweeper => "minesweeper",
            WordSearch => "word-search",
        }
    }

    pub const fn title(self) -> &'static str {
        use GameKind::*;
        match self {
            ThreeInARow => "Three in a row",
            Memory => "Memory",
            Sudoku => "Sudoku",
            Minesweeper => "Minesweeper",
            WordSearch => "Word search",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for GameKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.slug() == s || kind.route_prefix() == s)
            .ok_or_else(|| format!("unknown game {s:?}"))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    StartGame,
    PlayUserTurn,
    PlayTurn,
    GameStatus,
    ValidateMove,
    Flag,
    SelectWord,
}

impl Endpoint {
    pub const fn path(self) -> &'static str {
        use Endpoint::*;
        match self {
            StartGame => "start-game",
            PlayUserTurn => "play-user-turn",
            PlayTurn => "play-turn",
            GameStatus => "game-status",
            ValidateMove => "validate-move",
            Flag => "flag",
            SelectWord => "select-word",
        }
    }

    pub const fn method(self) -> Method {
        match self {
            Self::GameStatus => Method::Get,
            _ => Method::Post,
        }
    }
}

/// Coordinates of a single board cell, as the server expects them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellTarget {
    pub row: usize,
    pub col: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStart {
    pub pairs: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryTurn {
    pub position: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SudokuMove {
    pub row: usize,
    pub col: usize,
    pub value: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordChoice {
    pub word: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequestBody {
    Cell(CellTarget),
    MemoryStart(MemoryStart),
    MemoryTurn(MemoryTurn),
    SudokuMove(SudokuMove),
    Word(WordChoice),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    pub game: GameKind,
    pub endpoint: Endpoint,
    pub body: Option<RequestBody>,
}

impl ApiRequest {
    pub fn new(game: GameKind, endpoint: Endpoint) -> Self {
        Self {
            game,
            endpoint,
            body: None,
        }
    }

    pub fn with_body(game: GameKind, endpoint: Endpoint, body: RequestBody) -> Self {
        Self {
            game,
            endpoint,
            body: Some(body),
        }
    }

    pub fn method(&self) -> Method {
        self.endpoint.method()
    }

    /// Route relative to the API root, e.g. `memory/play-turn`.
    pub fn path(&self) -> String {
        format!("{}/{}", self.game.route_prefix(), self.endpoint.path())
    }

    /// Absolute URL below `api_url`, tolerating a trailing slash on the root.
    pub fn url(&self, api_url: &str) -> String {
        format!("{}/{}", api_url.trim_end_matches('/'), self.path())
    }
}

/// Raw response as received by the transport, before any interpretation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub const fn is_success(&self) -> bool {
        200 <= self.status && self.status < 300
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

/// Body of every non-2xx response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    pub message: ErrorMessage,
}

impl ErrorBody {
    pub fn into_messages(self) -> Vec<String> {
        match self.message {
            ErrorMessage::One(message) => vec![message],
            ErrorMessage::Many(messages) => messages,
        }
    }
}
