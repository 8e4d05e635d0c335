//! Error types for the engine

/// Errors raised by the engine.
///
/// Occupied or empty targets on placement and removal are not errors; those
/// operations report them as `false`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HexError {
    #[error("invalid coordinate label: {0:?}")]
    InvalidLabel(String),

    #[error("coordinate {label} is outside a {size}x{size} board")]
    OutOfBoard { label: String, size: u8 },

    #[error("board size must be between 1 and {max}, got {size}")]
    InvalidBoardSize { size: u8, max: u8 },

    #[error("no legal move: the board is full")]
    NoLegalMove,

    #[error("invalid move weights: {0}")]
    InvalidWeights(String),
}
