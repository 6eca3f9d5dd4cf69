//! Board snapshot request/response types and the advisory adapter.
//!
//! A snapshot is `{ "size": 3, "data": "W...B....", "nextPlayerColor": "w" }`.
//! `advise` loads it into a fresh engine and answers with the move the engine
//! would play, or with the final result when the board is already decided.
//!
//! Line breaks and tabs in `data` are layout and are dropped before decoding.
//! Spaces stay, because a space is an empty cell.
use crate::engine::{Game, GameStatus};
use crate::error::SquaresError;
use crate::squares::Square;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An advisory request: a board and the color to move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    /// Board width and height; `advise` rejects anything below 3, negatives included.
    pub size: i64,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub next_player_color: Option<String>,
}

/// An advisory response.
///
/// `row` and `col` are `-1` and `color` is `None` when there is no move to
/// suggest, either because the request was invalid or the game is over.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    pub row: i64,
    pub col: i64,
    pub color: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winning_square: Option<Vec<[usize; 2]>>,
}

impl MoveResponse {
    fn no_move(color: Option<String>, message: impl Into<String>) -> Self {
        MoveResponse {
            row: -1,
            col: -1,
            color,
            message: message.into(),
            winning_square: None,
        }
    }

    /// The body sent back for a request that failed validation.
    pub fn rejected(err: &SquaresError) -> Self {
        MoveResponse::no_move(None, err.to_string())
    }

    /// True when the response carries a playable move.
    pub fn has_move(&self) -> bool {
        self.row >= 0 && self.col >= 0
    }
}

fn square_pairs(square: Square) -> Vec<[usize; 2]> {
    square.iter().map(|&(r, c)| [r, c]).collect()
}

/// Answers a snapshot request.
///
/// Line breaks and tabs in `data` are ignored so multi-line boards can be
/// sent as-is.
///
/// # Arguments
/// * `snapshot`: The board and the color to move.
/// * `game`: The engine to load the board into. Any game it held is replaced.
///
/// # Returns
/// * `Ok(MoveResponse)` with the suggested move, the final result of a
///   decided board, or "no move" for a full board.
/// * `Err(SquaresError)` when the snapshot fails validation; render it with
///   `MoveResponse::rejected`.
pub fn advise(snapshot: &BoardSnapshot, game: &mut Game) -> Result<MoveResponse, SquaresError> {
    let size = usize::try_from(snapshot.size)
        .ok()
        .filter(|size| *size > 2)
        .ok_or(SquaresError::InvalidSize(snapshot.size))?;
    let data: String = snapshot
        .data
        .as_deref()
        .unwrap_or_default()
        .chars()
        .filter(|ch| !matches!(*ch, '\n' | '\r' | '\t'))
        .collect();

    let next = snapshot
        .next_player_color
        .as_deref()
        .ok_or_else(|| SquaresError::InvalidColor("missing".to_string()))?;
    let mut next_chars = next.chars();
    let next_char = match (next_chars.next(), next_chars.next()) {
        (Some(ch), None) => ch,
        _ => return Err(SquaresError::InvalidColor(next.to_string())),
    };

    let status = game.load_board(size, &data, next_char)?;
    debug!(size, ?status, "snapshot loaded");

    match status {
        GameStatus::Won(color) => {
            let mut response = MoveResponse::no_move(
                Some(color.to_char().to_ascii_lowercase().to_string()),
                format!("Game finished. {} wins!", color),
            );
            response.winning_square = game.winning_square().map(square_pairs);
            return Ok(response);
        }
        GameStatus::Draw => {
            return Ok(MoveResponse::no_move(
                Some("draw".to_string()),
                "Game finished. Draw",
            ));
        }
        GameStatus::Active => {}
    }

    let next_color = next_char.to_ascii_lowercase().to_string();
    Ok(match game.find_next_move()? {
        Some((row, col)) => MoveResponse {
            row: row as i64,
            col: col as i64,
            color: Some(next_color),
            message: "Move found".to_string(),
            winning_square: None,
        },
        None => MoveResponse::no_move(None, "No valid moves available"),
    })
}
