//! Square detection for any orientation.
//!
//! Points are treated as integer vectors. For two corners `A` and `B` with
//! delta `(dx, dy) = B - A` (row delta, column delta), the other two corners
//! of a square are `C = A + r` and `D = B + r` where `r` is one of the two
//! quarter-turns of the delta, `(-dy, dx)` or `(dy, -dx)`. Enumerating every
//! unordered pair of same-colored cells with both rotations therefore finds
//! axis-aligned squares of any size as well as tilted ones.
//!
//! The enumeration order (row-major cell order, then pair order, then
//! rotation order) decides which square or move is reported when several
//! exist, and callers rely on it being stable.
use crate::engine::{Board, Cell, Color, Coord};
use tracing::trace;

/// Four corners of a square, in detection order `[A, B, C, D]`.
pub type Square = [Coord; 4];

type Point = (isize, isize);

fn to_point((r, c): Coord) -> Point {
    (r as isize, c as isize)
}

/// Returns the two candidate `(C, D)` completions for the pair `(a, b)`.
fn square_completions(a: Point, b: Point) -> [(Point, Point); 2] {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    [(-dy, dx), (dy, -dx)].map(|(vx, vy)| ((a.0 + vx, a.1 + vy), (b.0 + vx, b.1 + vy)))
}

/// Calls `visit` with every candidate square built from a pair of `color` cells.
///
/// Stops and returns the first `Some` produced by `visit`.
fn scan_pairs<T>(
    board: &Board,
    color: Color,
    mut visit: impl FnMut(Coord, Coord, Point, Point) -> Option<T>,
) -> Option<T> {
    let cells = board.cells_of(color);
    for i in 0..cells.len() {
        for j in (i + 1)..cells.len() {
            let (a, b) = (cells[i], cells[j]);
            for (c, d) in square_completions(to_point(a), to_point(b)) {
                if let Some(found) = visit(a, b, c, d) {
                    return Some(found);
                }
            }
        }
    }
    None
}

/// Finds a square whose four corners all hold `color`.
///
/// Cost is O(k²) in the number `k` of `color` cells.
///
/// # Returns
/// The first complete square in enumeration order, or `None`.
///
/// # Examples
/// ```
/// use squares_engine::engine::Color;
/// use squares_engine::squares::find_completed_square;
/// use squares_engine::utils::board_from_rows;
///
/// let board = board_from_rows(&["WW.", "WW.", "..."]).unwrap();
/// assert_eq!(
///     find_completed_square(&board, Color::White),
///     Some([(0, 0), (0, 1), (1, 0), (1, 1)])
/// );
/// assert_eq!(find_completed_square(&board, Color::Black), None);
/// ```
pub fn find_completed_square(board: &Board, color: Color) -> Option<Square> {
    let wanted = Some(Cell::Colored(color));
    scan_pairs(board, color, |a, b, c, d| {
        if board.probe(c.0, c.1) == wanted && board.probe(d.0, d.1) == wanted {
            Some([a, b, (c.0 as usize, c.1 as usize), (d.0 as usize, d.1 as usize)])
        } else {
            None
        }
    })
}

/// General pair-based search for a square with three `color` corners and one
/// empty corner.
fn find_pair_one_move_win(board: &Board, color: Color) -> Option<Coord> {
    let wanted = Cell::Colored(color);
    scan_pairs(board, color, |_, _, c, d| {
        // A and B hold `color` by construction, so only C and D decide.
        let mut empty = None;
        for p in [c, d] {
            match board.probe(p.0, p.1)? {
                Cell::Empty if empty.is_none() => empty = Some((p.0 as usize, p.1 as usize)),
                cell if cell == wanted => {}
                _ => return None,
            }
        }
        empty
    })
}

/// Fast path: scans every unit (2×2) square for three `color` corners and one
/// empty corner.
///
/// Anchors are visited row-major; corners are checked in the order
/// `(r, c), (r + 1, c), (r, c + 1), (r + 1, c + 1)`.
pub fn find_unit_one_move_win(board: &Board, color: Color) -> Option<Coord> {
    let size = board.size();
    for r in 0..size - 1 {
        for c in 0..size - 1 {
            let corners = [(r, c), (r + 1, c), (r, c + 1), (r + 1, c + 1)];
            let mut empty = None;
            let mut valid = true;
            for &(cr, cc) in &corners {
                match board.probe(cr as isize, cc as isize) {
                    Some(Cell::Empty) if empty.is_none() => empty = Some((cr, cc)),
                    Some(Cell::Colored(found)) if found == color => {}
                    _ => {
                        valid = false;
                        break;
                    }
                }
            }
            if valid {
                if let Some(cell) = empty {
                    return Some(cell);
                }
            }
        }
    }
    None
}

/// Finds the empty cell that would complete a `color` square in one move.
///
/// The unit-square fast path runs first; the general pair search always has
/// the final word, so the reported cell is the first one-move win in pair
/// enumeration order. Every unit square is also a square, so the general
/// search finds a move whenever the fast path does.
///
/// # Returns
/// The completing cell, or `None` when `color` has no one-move win.
pub fn find_one_move_win(board: &Board, color: Color) -> Option<Coord> {
    let quick = find_unit_one_move_win(board, color);
    let general = find_pair_one_move_win(board, color);
    if let (Some(q), Some(g)) = (quick, general) {
        if q != g {
            trace!(%color, ?q, ?g, "unit fast path and pair search picked different cells");
        }
    }
    general.or(quick)
}

/// Counts unit squares holding exactly three `color` corners and one empty corner.
pub fn count_unit_threats(board: &Board, color: Color) -> usize {
    let size = board.size();
    let mut threats = 0;
    for r in 0..size - 1 {
        for c in 0..size - 1 {
            let mut mine = 0;
            let mut blocked = false;
            for (cr, cc) in [(r, c), (r + 1, c), (r, c + 1), (r + 1, c + 1)] {
                match board.probe(cr as isize, cc as isize) {
                    Some(Cell::Colored(found)) if found == color => mine += 1,
                    Some(Cell::Colored(_)) => blocked = true,
                    _ => {}
                }
            }
            if !blocked && mine == 3 {
                threats += 1;
            }
        }
    }
    threats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::board_from_rows;

    #[test]
    fn test_completed_unit_square() {
        let board = board_from_rows(&["WW.", "WW.", "BB."]).unwrap();
        assert_eq!(
            find_completed_square(&board, Color::White),
            Some([(0, 0), (0, 1), (1, 0), (1, 1)])
        );
        assert_eq!(find_completed_square(&board, Color::Black), None);
    }

    #[test]
    fn test_completed_large_axis_square() {
        let board = board_from_rows(&["B..B", "....", "....", "B..B"]).unwrap();
        let square = find_completed_square(&board, Color::Black).unwrap();
        let mut sorted = square.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![(0, 0), (0, 3), (3, 0), (3, 3)]);
    }

    #[test]
    fn test_completed_tilted_square() {
        // Diamond around the center of a 3×3 board.
        let board = board_from_rows(&[".W.", "W.W", ".W."]).unwrap();
        let square = find_completed_square(&board, Color::White).unwrap();
        let mut sorted = square.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![(0, 1), (1, 0), (1, 2), (2, 1)]);
    }

    #[test]
    fn test_tilted_knight_square() {
        // Side vector (1, 2): corners (0,1), (1,3), (3,2), (2,0).
        let board = board_from_rows(&[".W..", "...W", "W...", "..W."]).unwrap();
        assert!(find_completed_square(&board, Color::White).is_some());
    }

    #[test]
    fn test_rectangle_is_not_a_square() {
        let board = board_from_rows(&["W.W.", "W.W.", "....", "...."]).unwrap();
        assert_eq!(find_completed_square(&board, Color::White), None);
        let board = board_from_rows(&["WWW", "...", "WWW"]).unwrap();
        // (0,0),(0,2),(2,0),(2,2) is a square.
        assert!(find_completed_square(&board, Color::White).is_some());
    }

    #[test]
    fn test_square_detection_ignores_mixed_colors() {
        let board = board_from_rows(&["WB.", "WW.", "..."]).unwrap();
        assert_eq!(find_completed_square(&board, Color::White), None);
    }

    #[test]
    fn test_one_move_win_unit() {
        let board = board_from_rows(&["WW.", "W..", "..."]).unwrap();
        assert_eq!(find_one_move_win(&board, Color::White), Some((1, 1)));
        assert_eq!(find_unit_one_move_win(&board, Color::White), Some((1, 1)));
        assert_eq!(find_one_move_win(&board, Color::Black), None);
    }

    #[test]
    fn test_one_move_win_blocked_by_opponent() {
        let board = board_from_rows(&["WW.", "WB.", "..."]).unwrap();
        assert_eq!(find_one_move_win(&board, Color::White), None);
        assert_eq!(find_unit_one_move_win(&board, Color::White), None);
    }

    #[test]
    fn test_one_move_win_tilted_only_general_path() {
        // Three corners of the diamond; the missing one is (2,1).
        let board = board_from_rows(&[".W.", "W.W", "..."]).unwrap();
        assert_eq!(find_unit_one_move_win(&board, Color::White), None);
        assert_eq!(find_one_move_win(&board, Color::White), Some((2, 1)));
    }

    #[test]
    fn test_one_move_win_requires_inside_corners() {
        // Each completion of the pair either leaves the board or has two empty corners.
        let board = board_from_rows(&["W.W", "...", "..."]).unwrap();
        assert_eq!(find_one_move_win(&board, Color::White), None);
    }

    #[test]
    fn test_general_path_is_authoritative() {
        // Two different one-move wins: a large square missing (3,3) and a unit
        // square missing (3,1). The pair search meets the large one first.
        let board = board_from_rows(&["W..W", "....", "WW..", "W..."]).unwrap();
        let general = find_one_move_win(&board, Color::White);
        let quick = find_unit_one_move_win(&board, Color::White);
        assert_eq!(quick, Some((3, 1)));
        assert_eq!(general, Some((3, 3)));
    }

    #[test]
    fn test_count_unit_threats() {
        let board = board_from_rows(&["WWW", "W.W", "..."]).unwrap();
        assert_eq!(count_unit_threats(&board, Color::White), 2);
        let board = board_from_rows(&["WWW", "WBW", "..."]).unwrap();
        assert_eq!(count_unit_threats(&board, Color::White), 0);
        let board = board_from_rows(&["WW.", "WW.", "..."]).unwrap();
        assert_eq!(count_unit_threats(&board, Color::White), 0);
    }
}
