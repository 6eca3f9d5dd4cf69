//! Core game engine for Squares.
//!
//! This module defines the game's fundamental components:
//! - `Color` and `Cell`: the two stone colors and the state of a single grid cell.
//! - `Board`: the N×N grid with bounds/occupancy queries, text rendering and a
//!   scoped speculative placement used by the move selector.
//! - `Player`: a human or automated participant bound to one color.
//! - `Game`: the turn engine. It validates and applies moves, detects the end of
//!   the game, advances turns and drives automated players.
//!
//! Every mutating `Game` operation returns the `MoveRecord`s it produced, so
//! front ends render the game however they like.
use crate::error::SquaresError;
use crate::heuristics::{choose_move, MoveTier};
use crate::squares::{find_completed_square, Square};
use crate::utils::board_from_data;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// A `(row, col)` position on the board.
pub type Coord = (usize, usize);

/// The color of a stone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Returns the other color.
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Converts the color to its upper-case character code.
    ///
    /// # Examples
    ///
    /// ```
    /// use squares_engine::engine::Color;
    /// assert_eq!(Color::White.to_char(), 'W');
    /// assert_eq!(Color::Black.to_char(), 'B');
    /// ```
    pub fn to_char(self) -> char {
        match self {
            Color::White => 'W',
            Color::Black => 'B',
        }
    }

    /// Parses a color code, accepting both cases.
    ///
    /// # Returns
    /// * `Ok(Color)` for `W`, `w`, `B` or `b`.
    /// * `Err(SquaresError::InvalidColor)` for any other character.
    pub fn from_char(c: char) -> Result<Color, SquaresError> {
        match c.to_ascii_uppercase() {
            'W' => Ok(Color::White),
            'B' => Ok(Color::Black),
            _ => Err(SquaresError::InvalidColor(c.to_string())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// The state of a single cell on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    /// No stone has been placed here.
    Empty,
    /// A stone of the given color occupies the cell.
    Colored(Color),
}

impl Cell {
    /// Converts the cell to its character representation (`.`, `W` or `B`).
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Colored(color) => color.to_char(),
        }
    }

    /// Parses a cell from the board snapshot alphabet.
    ///
    /// `.` and space both mean empty; colors are case-insensitive. Returns `None`
    /// for anything else.
    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' => Some(Cell::Empty),
            other => Color::from_char(other).ok().map(Cell::Colored),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// Represents the game board as a row-major grid of `Cell`s.
///
/// The size is fixed for the lifetime of the board and is always greater than 2.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates a new board with every cell set to `Cell::Empty`.
    ///
    /// # Arguments
    /// * `size`: The width and height of the board.
    ///
    /// # Returns
    /// * `Ok(Board)` for `size > 2`.
    /// * `Err(SquaresError::InvalidSize)` otherwise.
    ///
    /// # Examples
    /// ```
    /// use squares_engine::engine::{Board, Cell};
    /// let board = Board::new(3).unwrap();
    /// assert_eq!(board.get(0, 0).unwrap(), Cell::Empty);
    /// assert!(Board::new(2).is_err());
    /// ```
    pub fn new(size: usize) -> Result<Self, SquaresError> {
        if size <= 2 {
            return Err(SquaresError::InvalidSize(size as i64));
        }
        let len = size
            .checked_mul(size)
            .ok_or_else(|| SquaresError::InvalidSize(i64::try_from(size).unwrap_or(i64::MAX)))?;
        Ok(Board {
            size,
            cells: vec![Cell::Empty; len],
        })
    }

    /// Returns the width (and height) of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, SquaresError> {
        if row >= self.size || col >= self.size {
            return Err(SquaresError::OutOfBounds { row, col });
        }
        Ok(row * self.size + col)
    }

    /// Returns the cell at `(row, col)`.
    ///
    /// # Returns
    /// * `Err(SquaresError::OutOfBounds)` if either coordinate is outside `[0, size)`.
    pub fn get(&self, row: usize, col: usize) -> Result<Cell, SquaresError> {
        let idx = self.index(row, col)?;
        Ok(self.cells[idx])
    }

    /// Overwrites the cell at `(row, col)`.
    ///
    /// Occupancy is not checked here; `Game` rejects occupied cells before
    /// calling this.
    ///
    /// # Returns
    /// * `Err(SquaresError::OutOfBounds)` if either coordinate is outside `[0, size)`.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Result<(), SquaresError> {
        let idx = self.index(row, col)?;
        self.cells[idx] = cell;
        Ok(())
    }

    /// Bounds test on signed coordinates, as produced by the square geometry.
    pub fn is_inside(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.size && (col as usize) < self.size
    }

    /// Returns the cell at a signed position, or `None` when it lies off the board.
    pub fn probe(&self, row: isize, col: isize) -> Option<Cell> {
        if self.is_inside(row, col) {
            Some(self.cells[row as usize * self.size + col as usize])
        } else {
            None
        }
    }

    /// True when no `Cell::Empty` remains.
    pub fn is_full(&self) -> bool {
        !self.cells.iter().any(|cell| cell.is_empty())
    }

    /// Collects the coordinates of every cell holding `color`, in row-major order.
    pub fn cells_of(&self, color: Color) -> Vec<Coord> {
        self.coords_matching(Cell::Colored(color))
    }

    /// Collects the coordinates of every empty cell, in row-major order.
    pub fn empty_cells(&self) -> Vec<Coord> {
        self.coords_matching(Cell::Empty)
    }

    fn coords_matching(&self, wanted: Cell) -> Vec<Coord> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == wanted)
            .map(|(idx, _)| (idx / self.size, idx % self.size))
            .collect()
    }

    /// Temporarily places `color` at `(row, col)`.
    ///
    /// The previous cell content is restored when the returned guard is dropped,
    /// whichever way the caller leaves its scope. The board can be read through
    /// the guard while the speculative stone is in place.
    ///
    /// # Returns
    /// * `Err(SquaresError::OutOfBounds)` if either coordinate is outside `[0, size)`.
    pub fn speculate(
        &mut self,
        row: usize,
        col: usize,
        color: Color,
    ) -> Result<Speculation<'_>, SquaresError> {
        let index = self.index(row, col)?;
        let previous = self.cells[index];
        self.cells[index] = Cell::Colored(color);
        Ok(Speculation {
            board: self,
            index,
            previous,
        })
    }

    /// Encodes the board as a row-major string of `.`, `W` and `B`.
    pub fn to_data_string(&self) -> String {
        self.cells.iter().map(|cell| cell.to_char()).collect()
    }

    /// Generates a string representation of the board, emphasising the given cells.
    ///
    /// The output has a header line with column numbers followed by one line per
    /// row, each prefixed with its row number. Highlighted cells are wrapped in
    /// ANSI bold/reverse-video escape codes, which is how the console shows a
    /// winning square.
    ///
    /// # Arguments
    /// * `highlight`: Coordinates to emphasise. Pass an empty slice for plain output.
    pub fn to_string_with_highlight(&self, highlight: &[Coord]) -> String {
        let width = (self.size - 1).to_string().len();
        let mut lines = Vec::with_capacity(self.size + 1);

        let mut header = format!("{:width$} ", "", width = width);
        for c_idx in 0..self.size {
            header.push_str(&format!("{:<width$} ", c_idx, width = width));
        }
        lines.push(header.trim_end().to_string());

        for r_idx in 0..self.size {
            let mut line = format!("{:>width$} ", r_idx, width = width);
            for c_idx in 0..self.size {
                let ch = self.cells[r_idx * self.size + c_idx].to_char();
                if highlight.contains(&(r_idx, c_idx)) {
                    line.push_str(&format!("\x1b[1;7m{}\x1b[m", ch));
                    line.push_str(&" ".repeat(width));
                } else {
                    line.push_str(&format!("{:<width$} ", ch, width = width));
                }
            }
            lines.push(line.trim_end().to_string());
        }

        lines.join("\n")
    }
}

impl fmt::Display for Board {
    /// Formats the board using `to_string_with_highlight(&[])`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_highlight(&[]))
    }
}

/// A speculative stone placed by `Board::speculate`.
///
/// Dereferences to the board with the stone in place and puts the previous
/// cell back on drop.
pub struct Speculation<'a> {
    board: &'a mut Board,
    index: usize,
    previous: Cell,
}

impl Deref for Speculation<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl Drop for Speculation<'_> {
    fn drop(&mut self) {
        self.board.cells[self.index] = self.previous;
    }
}

/// Who decides a player's moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerKind {
    /// Moves come from `Game::apply_move`.
    Human,
    /// Moves are chosen by the engine as soon as the player is on turn.
    Automated,
}

impl FromStr for PlayerKind {
    type Err = SquaresError;

    /// Parses the console words `user` and `comp`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(PlayerKind::Human),
            "comp" => Ok(PlayerKind::Automated),
            _ => Err(SquaresError::InvalidPlayerKind(s.to_string())),
        }
    }
}

/// A participant in a game. Immutable once constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Player {
    kind: PlayerKind,
    color: Color,
}

impl Player {
    pub fn new(kind: PlayerKind, color: Color) -> Self {
        Player { kind, color }
    }

    pub fn human(color: Color) -> Self {
        Player::new(PlayerKind::Human, color)
    }

    pub fn automated(color: Color) -> Self {
        Player::new(PlayerKind::Automated, color)
    }

    pub fn kind(&self) -> PlayerKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_automated(&self) -> bool {
        self.kind == PlayerKind::Automated
    }
}

/// The outcome state of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Active,
    Won(Color),
    Draw,
}

impl GameStatus {
    pub fn is_active(self) -> bool {
        self == GameStatus::Active
    }
}

/// A structured record of one placement and its consequences.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub color: Color,
    pub row: usize,
    pub col: usize,
    /// True when the engine chose this move for an automated player.
    pub automated: bool,
    /// The game status right after this placement.
    pub status: GameStatus,
    /// The square that ended the game, if this placement completed one.
    pub winning_square: Option<Square>,
}

/// Recomputes the status of a board without any game history.
///
/// White squares are checked before Black ones, then fullness. This is the
/// tie-break used for boards that are loaded in an already-finished state.
///
/// # Returns
/// The status together with the square that decided it, if any.
pub fn evaluate_status(board: &Board) -> (GameStatus, Option<Square>) {
    for color in [Color::White, Color::Black] {
        if let Some(square) = find_completed_square(board, color) {
            return (GameStatus::Won(color), Some(square));
        }
    }
    if board.is_full() {
        (GameStatus::Draw, None)
    } else {
        (GameStatus::Active, None)
    }
}

/// The state of one running (or finished) game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    players: [Player; 2],
    turn: usize,
    status: GameStatus,
    winning_square: Option<Square>,
}

impl GameState {
    fn new(board: Board, players: [Player; 2]) -> Self {
        GameState {
            board,
            players,
            turn: 0,
            status: GameStatus::Active,
            winning_square: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    /// Index of the player on turn (0 or 1).
    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn current_player(&self) -> Player {
        self.players[self.turn]
    }

    pub fn opponent(&self) -> Player {
        self.players[1 - self.turn]
    }

    /// The cached status, updated right after every placement.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn winning_square(&self) -> Option<Square> {
        self.winning_square
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Places the current player's stone and settles the status.
    ///
    /// The caller has already checked that the cell is empty. The turn is not
    /// advanced here.
    fn place(&mut self, row: usize, col: usize, automated: bool) -> Result<MoveRecord, SquaresError> {
        let color = self.current_player().color();
        self.board.set(row, col, Cell::Colored(color))?;
        debug!(%color, row, col, automated, "stone placed");

        if let Some(square) = find_completed_square(&self.board, color) {
            self.status = GameStatus::Won(color);
            self.winning_square = Some(square);
            info!(%color, ?square, "game won");
        } else if self.board.is_full() {
            self.status = GameStatus::Draw;
            info!("game drawn");
        }

        Ok(MoveRecord {
            color,
            row,
            col,
            automated,
            status: self.status,
            winning_square: self.winning_square,
        })
    }

    fn advance_turn(&mut self) {
        self.turn = 1 - self.turn;
    }

    /// Plays for automated players until a human is on turn or the game ends.
    ///
    /// Covers computer-vs-computer games, which run to completion in one call.
    fn run_automated_turns(
        &mut self,
        rng: &mut impl Rng,
        records: &mut Vec<MoveRecord>,
    ) -> Result<(), SquaresError> {
        while self.is_active() && self.current_player().is_automated() {
            let me = self.current_player().color();
            let opp = self.opponent().color();
            let Some((tier, (row, col))) = choose_move(&mut self.board, me, opp, rng) else {
                warn!(color = %me, "no move available for automated player on an active board");
                break;
            };
            debug!(color = %me, ?tier, row, col, "automated move chosen");
            records.push(self.place(row, col, true)?);
            if self.is_active() {
                self.advance_turn();
            }
        }
        Ok(())
    }
}

/// Manages a Squares game session.
///
/// A `Game` starts without a running game; `start_game` or `load_board` sets
/// one up. The random generator only feeds the last, weighted-random step of
/// move selection, so `with_seed` makes automated play fully reproducible.
///
/// # Examples
/// ```
/// use squares_engine::engine::{Color, Game, GameStatus, Player};
///
/// let mut game = Game::with_seed(7);
/// game.start_game(3, Player::human(Color::White), Player::human(Color::Black)).unwrap();
/// let records = game.apply_move(1, 1).unwrap();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].color, Color::White);
/// assert_eq!(game.status(), GameStatus::Active);
/// ```
#[derive(Clone, Debug)]
pub struct Game {
    state: Option<GameState>,
    rng: SmallRng,
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl Game {
    /// Creates an engine with no game running, seeding its generator from entropy.
    pub fn new() -> Self {
        Game {
            state: None,
            rng: SmallRng::from_entropy(),
        }
    }

    /// Creates an engine with no game running and a deterministic generator.
    pub fn with_seed(seed: u64) -> Self {
        Game {
            state: None,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// The current game, running or finished. `None` before the first start/load.
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn board(&self) -> Option<&Board> {
        self.state.as_ref().map(GameState::board)
    }

    /// True while a game is running and accepts moves.
    pub fn is_active(&self) -> bool {
        self.state.as_ref().is_some_and(GameState::is_active)
    }

    /// Starts a new game, replacing any previous one.
    ///
    /// If the first player is automated, the engine plays for it (and for the
    /// second player too when both are automated) before returning.
    ///
    /// # Arguments
    /// * `size`: Board width and height, must be greater than 2.
    /// * `first`: The player on turn first.
    /// * `second`: The other player; must have a different color.
    ///
    /// # Returns
    /// The records of any automated moves played, or
    /// `SquaresError::SameColor` / `SquaresError::InvalidSize`.
    pub fn start_game(
        &mut self,
        size: usize,
        first: Player,
        second: Player,
    ) -> Result<Vec<MoveRecord>, SquaresError> {
        if first.color() == second.color() {
            return Err(SquaresError::SameColor);
        }
        let board = Board::new(size)?;
        info!(size, ?first, ?second, "new game started");

        let mut state = GameState::new(board, [first, second]);
        let mut records = Vec::new();
        state.run_automated_turns(&mut self.rng, &mut records)?;
        self.state = Some(state);
        Ok(records)
    }

    /// Reconstructs a game from a board snapshot.
    ///
    /// Both players become automated, the one with `next_color` on turn. The
    /// status is recomputed from the board (see `evaluate_status`); no move is
    /// played, so this path only answers "what would the engine play next".
    ///
    /// # Arguments
    /// * `size`: Board width and height.
    /// * `data`: Row-major cells, `size * size` characters from `. W B w b` and space.
    /// * `next_color`: `W` or `B`, either case.
    ///
    /// # Returns
    /// The recomputed status, or `InvalidSize`, `InvalidColor` or `InvalidBoardData`.
    pub fn load_board(
        &mut self,
        size: usize,
        data: &str,
        next_color: char,
    ) -> Result<GameStatus, SquaresError> {
        if size <= 2 {
            return Err(SquaresError::InvalidSize(size as i64));
        }
        let next = Color::from_char(next_color)?;
        let board = board_from_data(size, data)?;
        let (status, winning_square) = evaluate_status(&board);
        debug!(size, next = %next, ?status, "board loaded");

        let mut state = GameState::new(
            board,
            [Player::automated(next), Player::automated(next.opponent())],
        );
        state.status = status;
        state.winning_square = winning_square;
        self.state = Some(state);
        Ok(status)
    }

    /// Plays the current (human) player's stone at `(row, col)`.
    ///
    /// On success the turn passes to the other player, and automated players
    /// move until a human is on turn again or the game ends. A failed call
    /// leaves the game untouched.
    ///
    /// # Returns
    /// Records for this move followed by any automated replies, or
    /// `NotStarted`, `OutOfBounds` or `CellOccupied`.
    pub fn apply_move(&mut self, row: usize, col: usize) -> Result<Vec<MoveRecord>, SquaresError> {
        let state = self
            .state
            .as_mut()
            .filter(|s| s.is_active())
            .ok_or(SquaresError::NotStarted)?;

        if !state.board.get(row, col)?.is_empty() {
            return Err(SquaresError::CellOccupied { row, col });
        }

        let mut records = vec![state.place(row, col, false)?];
        if state.is_active() {
            state.advance_turn();
            state.run_automated_turns(&mut self.rng, &mut records)?;
        }
        Ok(records)
    }

    /// Suggests a move for the player on turn without changing the game.
    pub fn find_next_move(&mut self) -> Result<Option<Coord>, SquaresError> {
        Ok(self.find_next_move_with_tier()?.map(|(_, coord)| coord))
    }

    /// Like `find_next_move`, also reporting which selection step produced the move.
    pub fn find_next_move_with_tier(&mut self) -> Result<Option<(MoveTier, Coord)>, SquaresError> {
        let state = self
            .state
            .as_mut()
            .filter(|s| s.is_active())
            .ok_or(SquaresError::NotStarted)?;
        let me = state.current_player().color();
        let opp = state.opponent().color();
        Ok(choose_move(&mut state.board, me, opp, &mut self.rng))
    }

    /// Recomputes the status from the board alone, ignoring the cached value.
    ///
    /// `GameStatus::Active` when no game has been set up yet.
    pub fn status(&self) -> GameStatus {
        match &self.state {
            Some(state) => evaluate_status(&state.board).0,
            None => GameStatus::Active,
        }
    }

    /// The square that ended the game, if any.
    pub fn winning_square(&self) -> Option<Square> {
        self.state.as_ref().and_then(GameState::winning_square)
    }
}
