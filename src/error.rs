//! Error types for bucket-boggle

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Crate error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A byte outside `a`..=`z` in a word or cell
    #[error("invalid letter {0:?}")]
    InvalidLetter(char),

    /// Board text did not supply exactly one token per cell
    #[error("expected {expected} cells, found {found}")]
    WrongCellCount { expected: usize, found: usize },

    /// A cell with no candidate letters
    #[error("cell {0} is empty")]
    EmptyCell(usize),

    /// The same candidate listed twice in one cell
    #[error("cell {cell} lists {letter:?} more than once")]
    DuplicateLetter { cell: usize, letter: char },

    /// Cell index past the end of the board
    #[error("cell {cell} is outside a board of {cells} cells")]
    CellOutOfRange { cell: usize, cells: usize },

    /// Unparseable board dimensions
    #[error("invalid board size: {0}")]
    InvalidBoardSize(String),

    /// Board with more cells than the used-cell mask can track
    #[error("board of {cells} cells exceeds the 64 cell limit")]
    BoardTooLarge { cells: usize },

    /// Malformed letter partition handed to bucket collapsing
    #[error("invalid buckets: {0}")]
    InvalidBuckets(String),

    /// Node arena budget exceeded
    #[error("arena exhausted: requested {requested} bytes with {used} of {capacity} used")]
    ArenaExhausted {
        requested: usize,
        used: usize,
        capacity: usize,
    },

    /// Forcing a (cell, letter) pair the board does not offer
    #[error("no possibility for cell {cell} letter {letter:?}")]
    UnknownPossibility { cell: usize, letter: char },
}

impl Error {
    /// Create an invalid buckets error
    pub fn invalid_buckets(msg: impl Into<String>) -> Self {
        Error::InvalidBuckets(msg.into())
    }

    /// Create an invalid board size error
    pub fn invalid_board_size(msg: impl Into<String>) -> Self {
        Error::InvalidBoardSize(msg.into())
    }
}
