use crate::board::Mark;
use std::fmt;

/// Why `Game::apply_move` refused a position.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MoveRejection {
    OutOfRange,
    Occupied,
    GameOver,
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MoveRejection::OutOfRange => write!(f, "position must be 1-9"),
            MoveRejection::Occupied => write!(f, "cell is already taken"),
            MoveRejection::GameOver => write!(f, "game is already over"),
        }
    }
}

/// Errors raised while setting up or playing a game.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("invalid move {position}: {reason}")]
    InvalidMove {
        position: usize,
        reason: MoveRejection,
    },

    #[error("invalid input {0:?}, expected a position 1-9")]
    InvalidInput(String),

    #[error("both players are assigned {0:?}")]
    SameMark(Mark),

    #[error("player {0:?} has no mark assigned")]
    UnassignedMark(String),

    #[error("{0} cannot choose moves")]
    UnimplementedStrategy(String),

    #[error("{mark:?} made {attempts} invalid moves in a row")]
    TooManyInvalidMoves { mark: Mark, attempts: u32 },

    #[error("invalid state key {0:?}")]
    InvalidStateKey(String),

    #[error("input closed before a move was entered")]
    InputClosed,

    #[error("player quit")]
    Quit,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GameError {
    /// Errors after which the same player may simply be asked again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GameError::InvalidMove { .. } | GameError::InvalidInput(_))
    }
}
