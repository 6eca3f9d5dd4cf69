use anyhow::{Context, Result};
use clap::Parser;
use squares_engine::command::CommandProcessor;
use squares_engine::engine::Game;
use std::io::{self, BufRead, Write};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play Squares in the terminal", long_about = None)]
struct Args {
    /// Seed for the computer player's random choices
    #[clap(short, long)]
    seed: Option<u64>,

    /// Print the final board without highlighting the winning square
    #[clap(long)]
    plain: bool,
}

fn main() -> Result<()> {
    squares_engine::init_logging();
    let args = Args::parse();

    let game = match args.seed {
        Some(seed) => Game::with_seed(seed),
        None => Game::new(),
    };
    let mut processor = CommandProcessor::new(game).with_highlight(!args.plain);

    println!("Welcome to Squares! Type HELP for the list of commands.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut input = String::new();
    loop {
        print!("> ");
        stdout.flush().context("failed to flush stdout")?;

        input.clear();
        let read = stdin
            .lock()
            .read_line(&mut input)
            .context("failed to read from stdin")?;
        if read == 0 {
            break;
        }

        let reply = processor.process(&input);
        for line in &reply.lines {
            println!("{}", line);
        }
        if reply.exit {
            break;
        }
    }

    Ok(())
}
