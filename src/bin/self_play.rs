use anyhow::{ensure, Result};
use clap::Parser;
use squares_engine::engine::{Color, Game, GameStatus, Player};
use squares_engine::heuristics::MoveTier;
use std::collections::BTreeMap;
use tracing::info;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Run computer-vs-computer Squares games", long_about = None)]
struct Args {
    /// Number of games to play
    #[clap(short, long, default_value_t = 20)]
    games: u64,

    /// Board size
    #[clap(short = 'n', long, default_value_t = 5)]
    size: usize,

    /// Seed of the first game; game i uses seed + i
    #[clap(short, long, default_value_t = 0)]
    seed: u64,
}

/// Plays one game move by move so the selection tier of every move is known.
fn play_one(size: usize, seed: u64, tiers: &mut BTreeMap<MoveTier, u64>) -> Result<(GameStatus, usize)> {
    let mut game = Game::with_seed(seed);
    game.start_game(size, Player::human(Color::White), Player::human(Color::Black))?;

    let mut moves = 0;
    while game.is_active() {
        let Some((tier, (row, col))) = game.find_next_move_with_tier()? else {
            break;
        };
        *tiers.entry(tier).or_default() += 1;
        game.apply_move(row, col)?;
        moves += 1;
    }
    Ok((game.status(), moves))
}

fn main() -> Result<()> {
    squares_engine::init_logging();
    let args = Args::parse();
    ensure!(args.games > 0, "--games must be at least 1");

    println!("Playing {} games on a {}x{} board...", args.games, args.size, args.size);

    let mut white_wins = 0u64;
    let mut black_wins = 0u64;
    let mut draws = 0u64;
    let mut total_moves = 0usize;
    let mut tiers = BTreeMap::new();

    for idx in 0..args.games {
        let seed = args.seed + idx;
        let (status, moves) = play_one(args.size, seed, &mut tiers)?;
        info!(seed, ?status, moves, "game finished");
        match status {
            GameStatus::Won(Color::White) => white_wins += 1,
            GameStatus::Won(Color::Black) => black_wins += 1,
            GameStatus::Draw => draws += 1,
            GameStatus::Active => {}
        }
        total_moves += moves;
        println!("  Game {:<4} (Seed: {:<6}) {:<10} Moves: {}", idx, seed, format!("{:?}", status), moves);
    }

    println!("\n--- Results ---");
    println!("White wins: {}", white_wins);
    println!("Black wins: {}", black_wins);
    println!("Draws:      {}", draws);
    println!("Average moves per game: {:.2}", total_moves as f64 / args.games as f64);

    println!("\n--- Moves by selection step ---");
    for (tier, count) in &tiers {
        println!("{:<16}: {}", format!("{:?}", tier), count);
    }

    Ok(())
}
