use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Not signed in")]
    MissingToken,
    #[error("Server rejected the credentials (status {0})")]
    Rejected(u16),
}

/// Moves refused locally, before anything is sent to the server.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveRejection {
    #[error("Game already ended, no new moves are accepted")]
    GameOver,
    #[error("Invalid coordinates")]
    OutOfBounds,
    #[error("Position on the board occupied")]
    Occupied,
    #[error("Card is already face up")]
    CardAlreadyShown,
    #[error("Cell is a fixed clue")]
    FixedCell,
    #[error("Enter a number between 1 and 9, got {0}")]
    DigitOutOfRange(u8),
    #[error("Cell is not hidden")]
    CellNotHidden,
    #[error("Cell is already revealed")]
    AlreadyRevealed,
    #[error("No cells selected")]
    EmptySelection,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Malformed server payload: {0}")]
    MalformedPayload(String),
    #[error("Another move is still being processed")]
    Busy,
    #[error(transparent)]
    Rejected(#[from] MoveRejection),
    #[error("Session already closed")]
    Closed,
}

impl SyncError {
    /// The host should hand control to the login flow.
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPayload(reason.into())
    }
}

pub type Result<T> = core::result::Result<T, SyncError>;
