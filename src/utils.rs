use crate::engine::{Board, Cell};
use crate::error::SquaresError;

/// Builds a `Board` from its snapshot encoding.
///
/// The data is read row-major and must hold exactly `size * size` characters.
///
/// Valid characters are:
/// - `.` or space: `Cell::Empty`
/// - `W` / `w`: a White stone
/// - `B` / `b`: a Black stone
///
/// # Arguments
/// * `size`: Width and height of the board.
/// * `data`: The encoded cells.
///
/// # Returns
/// * `Ok(Board)` if decoding succeeds.
/// * `Err(SquaresError::InvalidSize)` if `size <= 2`.
/// * `Err(SquaresError::InvalidBoardData)` on a wrong length or an unrecognized character.
///
/// # Examples
/// ```
/// use squares_engine::engine::{Cell, Color};
/// use squares_engine::utils::board_from_data;
///
/// let board = board_from_data(3, "w.. B   .").unwrap();
/// assert_eq!(board.get(0, 0).unwrap(), Cell::Colored(Color::White));
/// assert_eq!(board.get(1, 0).unwrap(), Cell::Empty);
/// assert_eq!(board.get(1, 1).unwrap(), Cell::Colored(Color::Black));
///
/// assert!(board_from_data(3, "W.X......").is_err());
/// assert!(board_from_data(3, "W.").is_err());
/// ```
pub fn board_from_data(size: usize, data: &str) -> Result<Board, SquaresError> {
    if size <= 2 {
        return Err(SquaresError::InvalidSize(size as i64));
    }

    // The length is checked before the board is allocated.
    let len = data.chars().count();
    match size.checked_mul(size) {
        Some(expected) if expected == len => {}
        Some(expected) => {
            return Err(SquaresError::InvalidBoardData(format!(
                "expected {} cells, found {}",
                expected, len
            )));
        }
        None => {
            return Err(SquaresError::InvalidBoardData(format!(
                "size {} is too large for {} cells",
                size, len
            )));
        }
    }

    let mut board = Board::new(size)?;

    for (idx, ch) in data.chars().enumerate() {
        let cell = Cell::from_char(ch).ok_or_else(|| {
            SquaresError::InvalidBoardData(format!("invalid character '{}' at position {}", ch, idx))
        })?;
        board.set(idx / size, idx % size, cell)?;
    }

    Ok(board)
}

/// Parses an array of row strings into a square `Board`.
///
/// Each string is one row, starting from row 0; the board size is the number
/// of rows and every row must have that many characters. Uses the same
/// alphabet as `board_from_data`.
///
/// # Returns
/// * `Err(SquaresError::InvalidBoardData)` if a row has the wrong length or an
///   unrecognized character.
/// * `Err(SquaresError::InvalidSize)` for fewer than three rows.
pub fn board_from_rows(rows: &[&str]) -> Result<Board, SquaresError> {
    let size = rows.len();
    for (r, row) in rows.iter().enumerate() {
        let len = row.chars().count();
        if len != size {
            return Err(SquaresError::InvalidBoardData(format!(
                "row {} has {} characters (expected {})",
                r, len, size
            )));
        }
    }
    board_from_data(size, &rows.concat())
}
