/// Errors reported by the Squares engine and its console/snapshot front ends.
///
/// Every variant is a validation failure of caller input; nothing here is
/// transient, so callers report these and never retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SquaresError {
    #[error("Size must be > 2, got {0}")]
    InvalidSize(i64),

    #[error("Invalid player color: {0}")]
    InvalidColor(String),

    #[error("Players cannot have the same color")]
    SameColor,

    #[error("Invalid board data: {0}")]
    InvalidBoardData(String),

    #[error("Coordinates out of board: ({row}, {col})")]
    OutOfBounds { row: usize, col: usize },

    #[error("Cell already occupied: ({row}, {col})")]
    CellOccupied { row: usize, col: usize },

    #[error("Game not started")]
    NotStarted,

    #[error("Invalid player type: {0} (must be 'user' or 'comp')")]
    InvalidPlayerKind(String),

    #[error("Incorrect command: {0}")]
    InvalidCommand(String),
}
