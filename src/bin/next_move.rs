use anyhow::{bail, Context, Result};
use clap::Parser;
use squares_engine::engine::Game;
use squares_engine::snapshot::{advise, BoardSnapshot, MoveResponse};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Suggest the next move for a Squares board", long_about = None)]
struct Args {
    /// Path to a JSON snapshot: {"size": N, "data": "...", "nextPlayerColor": "w"}
    snapshot_file: Option<PathBuf>,

    /// Board size, used with --data and --color instead of a snapshot file
    #[clap(
        long,
        allow_negative_numbers = true,
        conflicts_with = "snapshot_file",
        requires_all = ["data", "color"]
    )]
    size: Option<i64>,

    /// Row-major cells ('.', ' ', 'W', 'B'); line breaks are ignored
    #[clap(long)]
    data: Option<String>,

    /// Color to move, 'w' or 'b'
    #[clap(long)]
    color: Option<String>,

    /// Seed for the random fallback step of move selection
    #[clap(short, long)]
    seed: Option<u64>,
}

fn read_snapshot(args: &Args) -> Result<BoardSnapshot> {
    if let Some(path) = &args.snapshot_file {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        return serde_json::from_str(&content)
            .with_context(|| format!("invalid snapshot JSON in {}", path.display()));
    }
    match args.size {
        Some(size) => Ok(BoardSnapshot {
            size,
            data: args.data.clone(),
            next_player_color: args.color.clone(),
        }),
        None => bail!("pass a snapshot file or --size, --data and --color"),
    }
}

fn main() -> Result<ExitCode> {
    squares_engine::init_logging();
    let args = Args::parse();
    let snapshot = read_snapshot(&args)?;

    let mut game = match args.seed {
        Some(seed) => Game::with_seed(seed),
        None => Game::new(),
    };

    let (response, code) = match advise(&snapshot, &mut game) {
        Ok(response) => (response, ExitCode::SUCCESS),
        Err(err) => {
            tracing::warn!(%err, "snapshot rejected");
            (MoveResponse::rejected(&err), ExitCode::from(2))
        }
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(code)
}
