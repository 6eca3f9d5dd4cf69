//! # Squares Engine Library
//!
//! Game logic for "Squares": two players take turns coloring cells of an N×N
//! grid, and the first to own all four corners of a square wins. Squares of
//! any size count, axis-aligned or tilted.
//!
//! It is used by three binaries:
//! - `squares`: Interactive console game driven by `GAME`/`MOVE` commands.
//! - `next_move`: Reads a board snapshot (JSON) and prints the move the
//!   engine would play, also as JSON.
//! - `self_play`: Plays computer-vs-computer games and reports the results.
//!
//! ## Modules
//! - `engine`: The board (`Board`), players, game status and the `Game`
//!   engine that validates moves, detects the end and drives automated players.
//! - `squares`: Square detection in any orientation, and one-move wins.
//! - `heuristics`: The move-selection priority chain for automated players.
//! - `command`: Console command parsing and processing.
//! - `snapshot`: JSON request/response types for the move-advisory adapter.
//! - `utils`: Board text decoding.
//! - `error`: The `SquaresError` type shared by all modules.

pub mod command;
pub mod engine;
pub mod error;
pub mod heuristics;
pub mod snapshot;
pub mod squares;
pub mod utils;

pub use error::SquaresError;

/// Installs the stderr log subscriber used by the binaries.
///
/// The filter comes from `RUST_LOG` and defaults to `warn`, so stdout only
/// carries game output.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
