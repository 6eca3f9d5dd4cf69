//! Move selection for automated players.
//!
//! `choose_move` walks a fixed priority chain and returns the first move any
//! step produces:
//! 1. win now,
//! 2. block the opponent's one-move win,
//! 3. create a double threat (two unit squares one stone away from complete),
//! 4. best positional score (center distance plus unit-square potential),
//! 5. weighted random pick favouring the center.
//!
//! Only the last step uses randomness. There is no lookahead beyond the
//! speculative stone of step 3.
use crate::engine::{Board, Cell, Color, Coord};
use crate::squares::{count_unit_threats, find_one_move_win};
use rand::Rng;
use tracing::debug;

/// Multiplier for the center-distance part of the positional score.
pub const CENTER_WEIGHT: i64 = 3;
/// Unit square holding three of my stones and none of the opponent's.
pub const THREE_MINE_BONUS: i64 = 100;
/// Unit square holding two of my stones and none of the opponent's.
pub const TWO_MINE_BONUS: i64 = 20;
/// Unit square holding two opponent stones and none of mine.
pub const TWO_OPPONENT_BONUS: i64 = 15;
/// Unit square holding one of my stones and none of the opponent's.
pub const ONE_MINE_BONUS: i64 = 5;

/// The step of the priority chain that produced a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MoveTier {
    WinNow,
    Block,
    DoubleThreat,
    Positional,
    WeightedRandom,
}

/// Chooses a move for `me` playing against `opp`.
///
/// The board is borrowed mutably only for the speculative stones of the
/// double-threat step; it is unchanged when this returns.
///
/// # Arguments
/// * `board`: The current board.
/// * `me`: The color to move.
/// * `opp`: The opponent's color.
/// * `rng`: Random source for the weighted-random step.
///
/// # Returns
/// The tier and the coordinate of an empty cell, or `None` when the board is full.
pub fn choose_move(
    board: &mut Board,
    me: Color,
    opp: Color,
    rng: &mut impl Rng,
) -> Option<(MoveTier, Coord)> {
    let choice = find_one_move_win(board, me)
        .map(|coord| (MoveTier::WinNow, coord))
        .or_else(|| find_one_move_win(board, opp).map(|coord| (MoveTier::Block, coord)))
        .or_else(|| find_double_threat(board, me).map(|coord| (MoveTier::DoubleThreat, coord)))
        .or_else(|| choose_positional(board, me, opp).map(|coord| (MoveTier::Positional, coord)))
        .or_else(|| {
            choose_weighted_random(board, rng).map(|coord| (MoveTier::WeightedRandom, coord))
        });
    debug!(%me, ?choice, "move selected");
    choice
}

/// Finds the first empty cell (row-major) whose stone would leave `me` with at
/// least two unit-square one-move wins.
///
/// Each candidate stone is placed speculatively and taken back before the next
/// candidate is tried, including when it matches. Only unit squares count here,
/// even though the win and block steps consider squares of any shape.
pub fn find_double_threat(board: &mut Board, me: Color) -> Option<Coord> {
    for (r, c) in board.empty_cells() {
        let Ok(trial) = board.speculate(r, c, me) else {
            continue;
        };
        let threats = count_unit_threats(&trial, me);
        drop(trial);
        if threats >= 2 {
            return Some((r, c));
        }
    }
    None
}

/// Manhattan distance from `(r, c)` to the center cell `(size / 2, size / 2)`.
fn center_distance(size: usize, (r, c): Coord) -> usize {
    let center = size / 2;
    r.abs_diff(center) + c.abs_diff(center)
}

/// Scores an empty cell for the positional step.
///
/// The score is `(size - center distance) * CENTER_WEIGHT`, plus a bonus for
/// every unit square containing the cell, keyed to the stones already in it.
/// Squares holding both colors add nothing.
pub fn evaluate_cell(board: &Board, (r, c): Coord, me: Color, opp: Color) -> i64 {
    let size = board.size();
    let mut score = (size as i64 - center_distance(size, (r, c)) as i64) * CENTER_WEIGHT;

    for dr in [-1isize, 0] {
        for dc in [-1isize, 0] {
            let (ar, ac) = (r as isize + dr, c as isize + dc);
            // The whole 2×2 block has to fit on the board.
            if !board.is_inside(ar, ac) || !board.is_inside(ar + 1, ac + 1) {
                continue;
            }

            let (mut mine, mut theirs) = (0, 0);
            for (br, bc) in [(ar, ac), (ar + 1, ac), (ar, ac + 1), (ar + 1, ac + 1)] {
                match board.probe(br, bc) {
                    Some(Cell::Colored(color)) if color == me => mine += 1,
                    Some(Cell::Colored(color)) if color == opp => theirs += 1,
                    _ => {}
                }
            }

            score += match (mine, theirs) {
                (3, 0) => THREE_MINE_BONUS,
                (2, 0) => TWO_MINE_BONUS,
                (0, 2) => TWO_OPPONENT_BONUS,
                (1, 0) => ONE_MINE_BONUS,
                _ => 0,
            };
        }
    }

    score
}

/// Picks the empty cell with the highest `evaluate_cell` score.
///
/// Ties go to the first cell in row-major order. Returns `None` only for a
/// full board.
pub fn choose_positional(board: &Board, me: Color, opp: Color) -> Option<Coord> {
    let mut best: Option<(i64, Coord)> = None;
    for coord in board.empty_cells() {
        let score = evaluate_cell(board, coord, me, opp);
        if best.map_or(true, |(best_score, _)| score > best_score) {
            best = Some((score, coord));
        }
    }
    best.map(|(_, coord)| coord)
}

/// Picks an empty cell at random, weighting cells near the center.
///
/// Each empty cell gets `max(1, (size - center distance) + rand{0, 1, 2})`
/// tickets; one ticket is drawn uniformly.
pub fn choose_weighted_random(board: &Board, rng: &mut impl Rng) -> Option<Coord> {
    let size = board.size();
    let mut tickets = Vec::new();
    for coord in board.empty_cells() {
        let base = size as i64 - center_distance(size, coord) as i64;
        let weight = (base + rng.gen_range(0..=2)).max(1);
        for _ in 0..weight {
            tickets.push(coord);
        }
    }

    if tickets.is_empty() {
        None
    } else {
        Some(tickets[rng.gen_range(0..tickets.len())])
    }
}
