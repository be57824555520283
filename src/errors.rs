//! Typed errors for every fallible text boundary of the engine.
//!
//! Parsing never substitutes defaults for malformed input; callers get a
//! variant describing what was rejected.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("invalid FEN: {reason}")]
    InvalidFen { reason: String },

    #[error("invalid piece character '{0}' in board layout")]
    InvalidPieceChar(char),

    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("invalid move text: {0}")]
    InvalidMove(String),

    #[error("move {0} is not legal in this position")]
    IllegalMove(String),
}

impl ChessError {
    pub(crate) fn fen(reason: impl Into<String>) -> Self {
        ChessError::InvalidFen {
            reason: reason.into(),
        }
    }
}

pub type ChessResult<T> = Result<T, ChessError>;
