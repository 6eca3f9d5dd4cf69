//! Line-oriented console commands.
//!
//! ```text
//! GAME N, TYPE C, TYPE C   start a game (TYPE is user/comp, C is W/B)
//! MOVE X, Y                play at row X, column Y
//! HELP
//! EXIT
//! ```
use crate::engine::{Board, Cell, Color, Game, GameStatus, MoveRecord, Player, PlayerKind};
use crate::error::SquaresError;
use tracing::debug;

pub const HELP_TEXT: &str = "Available commands:
GAME N, U1, U2 - start a new game
  N: board size (> 2)
  U1, U2: player parameters (TYPE C)
    TYPE: 'user' or 'comp'
    C: color ('W' or 'B')
MOVE X, Y - make a move
EXIT - exit program
HELP - show this help message";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Game {
        size: usize,
        first: Player,
        second: Player,
    },
    Move {
        row: usize,
        col: usize,
    },
    Help,
    Exit,
}

fn invalid(line: &str) -> SquaresError {
    SquaresError::InvalidCommand(line.to_string())
}

/// Splits a line into its upper-cased keyword and the remaining arguments.
fn split_keyword(line: &str) -> (String, &str) {
    let trimmed = line.trim();
    match trimmed.find(char::is_whitespace) {
        Some(pos) => (trimmed[..pos].to_ascii_uppercase(), trimmed[pos..].trim()),
        None => (trimmed.to_ascii_uppercase(), ""),
    }
}

fn parse_player(param: &str, line: &str) -> Result<Player, SquaresError> {
    let tokens: Vec<&str> = param.split_whitespace().collect();
    let [kind, color] = tokens.as_slice() else {
        return Err(invalid(line));
    };
    let kind: PlayerKind = kind.parse()?;
    let mut chars = color.chars();
    let color = match (chars.next(), chars.next()) {
        (Some(ch), None) => Color::from_char(ch)?,
        _ => return Err(SquaresError::InvalidColor(color.to_string())),
    };
    Ok(Player::new(kind, color))
}

/// Parses one console line.
///
/// Keywords are case-insensitive. `GAME` arguments are comma separated;
/// `MOVE` coordinates may be separated by a comma, whitespace or both.
/// Board-level checks (size, distinct colors, bounds) are left to the engine.
///
/// # Examples
/// ```
/// use squares_engine::command::{parse_command, Command};
///
/// assert_eq!(parse_command("move 1, 2"), Ok(Command::Move { row: 1, col: 2 }));
/// assert_eq!(parse_command("HELP"), Ok(Command::Help));
/// assert!(parse_command("JUMP 1 2").is_err());
/// ```
pub fn parse_command(line: &str) -> Result<Command, SquaresError> {
    let (keyword, args) = split_keyword(line);
    match keyword.as_str() {
        "GAME" => {
            let parts: Vec<&str> = args.split(',').map(str::trim).collect();
            let [size, first, second] = parts.as_slice() else {
                return Err(invalid(line));
            };
            let size = size.parse::<usize>().map_err(|_| invalid(line))?;
            Ok(Command::Game {
                size,
                first: parse_player(first, line)?,
                second: parse_player(second, line)?,
            })
        }
        "MOVE" => {
            let args = args.replace(',', " ");
            let coords: Vec<&str> = args.split_whitespace().collect();
            let [row, col] = coords.as_slice() else {
                return Err(invalid(line));
            };
            Ok(Command::Move {
                row: row.parse().map_err(|_| invalid(line))?,
                col: col.parse().map_err(|_| invalid(line))?,
            })
        }
        "HELP" if args.is_empty() => Ok(Command::Help),
        "EXIT" if args.is_empty() => Ok(Command::Exit),
        _ => Err(invalid(line)),
    }
}

/// What the console should print for one command, and whether to stop.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub exit: bool,
}

impl Reply {
    fn line(text: impl Into<String>) -> Self {
        Reply {
            lines: vec![text.into()],
            exit: false,
        }
    }
}

/// Drives a `Game` from console lines.
#[derive(Debug)]
pub struct CommandProcessor {
    game: Game,
    highlight_wins: bool,
}

impl CommandProcessor {
    pub fn new(game: Game) -> Self {
        CommandProcessor {
            game,
            highlight_wins: false,
        }
    }

    /// Draw the final board with the winning square emphasised (ANSI escapes).
    pub fn with_highlight(mut self, highlight_wins: bool) -> Self {
        self.highlight_wins = highlight_wins;
        self
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Handles one line of input.
    ///
    /// Every failure is reported as `Incorrect command`, except a move while no
    /// game is running, which prints `Game not started`.
    pub fn process(&mut self, line: &str) -> Reply {
        let (keyword, _) = split_keyword(line);
        if keyword == "MOVE" && !self.game.is_active() {
            return Reply::line(SquaresError::NotStarted.to_string());
        }

        let command = match parse_command(line) {
            Ok(command) => command,
            Err(err) => {
                debug!(%err, "rejected command");
                return Reply::line("Incorrect command");
            }
        };

        let result = match command {
            Command::Game {
                size,
                first,
                second,
            } => self
                .game
                .start_game(size, first, second)
                .and_then(|records| self.render(Some("New game started"), &records)),
            Command::Move { row, col } => self
                .game
                .apply_move(row, col)
                .and_then(|records| self.render(None, &records)),
            Command::Help => Ok(HELP_TEXT.lines().map(str::to_string).collect()),
            Command::Exit => {
                return Reply {
                    lines: Vec::new(),
                    exit: true,
                }
            }
        };

        match result {
            Ok(lines) => Reply { lines, exit: false },
            Err(SquaresError::NotStarted) => Reply::line(SquaresError::NotStarted.to_string()),
            Err(err) => {
                debug!(%err, "command failed");
                Reply::line("Incorrect command")
            }
        }
    }

    /// Renders the records of one command, showing the board after each placement.
    fn render(
        &self,
        banner: Option<&str>,
        records: &[MoveRecord],
    ) -> Result<Vec<String>, SquaresError> {
        let mut lines: Vec<String> = banner.into_iter().map(str::to_string).collect();
        let Some(board) = self.game.board() else {
            return Ok(lines);
        };

        // Rewind the stones placed by this command, then replay them one by one.
        let mut replay: Board = board.clone();
        for record in records {
            replay.set(record.row, record.col, Cell::Empty)?;
        }

        for (idx, record) in records.iter().enumerate() {
            replay.set(record.row, record.col, Cell::Colored(record.color))?;
            lines.push(format!("{} ({}, {})", record.color, record.row, record.col));
            lines.push("Current board state:".to_string());

            let last = idx + 1 == records.len();
            let rendered = match record.winning_square {
                Some(square) if last && self.highlight_wins => {
                    replay.to_string_with_highlight(&square)
                }
                _ => replay.to_string(),
            };
            lines.extend(rendered.lines().map(str::to_string));

            match record.status {
                GameStatus::Won(color) => {
                    lines.push(format!("Game finished. {} wins!", color));
                    if let Some(square) = record.winning_square {
                        let coords: Vec<String> =
                            square.iter().map(|(r, c)| format!("({},{})", r, c)).collect();
                        lines.push(format!("Winning square coordinates: {}", coords.join(" ")));
                    }
                }
                GameStatus::Draw => lines.push("Game finished. Draw".to_string()),
                GameStatus::Active => {}
            }
        }
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> CommandProcessor {
        CommandProcessor::new(Game::with_seed(42))
    }

    fn run(processor: &mut CommandProcessor, line: &str) -> String {
        processor.process(line).lines.join("\n")
    }

    #[test]
    fn test_parse_game() {
        assert_eq!(
            parse_command("game 3, user W, comp b"),
            Ok(Command::Game {
                size: 3,
                first: Player::human(Color::White),
                second: Player::automated(Color::Black),
            })
        );
        assert!(parse_command("GAME 3, user W").is_err());
        assert!(parse_command("GAME x, user W, user B").is_err());
        assert!(matches!(
            parse_command("GAME 3, foo W, user B"),
            Err(SquaresError::InvalidPlayerKind(_))
        ));
        assert!(matches!(
            parse_command("GAME 3, user WB, user B"),
            Err(SquaresError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_parse_move_separators() {
        let expected = Ok(Command::Move { row: 2, col: 1 });
        assert_eq!(parse_command("MOVE 2, 1"), expected);
        assert_eq!(parse_command("MOVE 2 1"), expected);
        assert_eq!(parse_command("  move 2,1  "), expected);
        assert!(parse_command("MOVE 2").is_err());
        assert!(parse_command("MOVE -1, 0").is_err());
        assert!(parse_command("").is_err());
    }

    #[test]
    fn test_start_game_output() {
        let mut p = processor();
        assert_eq!(run(&mut p, "GAME 3, user W, user B"), "New game started");
        assert!(p.game().is_active());
    }

    #[test]
    fn test_invalid_game_commands() {
        let mut p = processor();
        for line in [
            "GAME 2, user W, user B",
            "GAME 3, foo W, user B",
            "GAME 3, user W, user W",
        ] {
            assert_eq!(run(&mut p, line), "Incorrect command");
            assert!(!p.game().is_active());
        }
    }

    #[test]
    fn test_move_before_start() {
        let mut p = processor();
        assert_eq!(run(&mut p, "MOVE 0, 0"), "Game not started");
        assert_eq!(run(&mut p, "MOVE nonsense"), "Game not started");
    }

    #[test]
    fn test_valid_move_output() {
        let mut p = processor();
        run(&mut p, "GAME 3, user W, user B");
        assert_eq!(
            run(&mut p, "MOVE 0, 0"),
            "W (0, 0)\nCurrent board state:\n  0 1 2\n0 W . .\n1 . . .\n2 . . ."
        );
    }

    #[test]
    fn test_invalid_moves() {
        let mut p = processor();
        run(&mut p, "GAME 3, user W, user B");
        assert_eq!(run(&mut p, "MOVE 3, 0"), "Incorrect command");
        run(&mut p, "MOVE 0, 0");
        assert_eq!(run(&mut p, "MOVE 0, 0"), "Incorrect command");
    }

    #[test]
    fn test_win_output() {
        let mut p = processor();
        run(&mut p, "GAME 3, user W, user B");
        let mut last = String::new();
        for mv in ["0, 0", "2, 2", "0, 1", "2, 1", "1, 0", "2, 0", "1, 1"] {
            last = run(&mut p, &format!("MOVE {}", mv));
        }
        assert_eq!(
            last,
            "W (1, 1)\nCurrent board state:\n  0 1 2\n0 W W .\n1 W W .\n2 B B B\n\
             Game finished. W wins!\n\
             Winning square coordinates: (0,0) (0,1) (1,0) (1,1)"
        );
        assert!(!p.game().is_active());
        assert_eq!(run(&mut p, "MOVE 0, 2"), "Game not started");
    }

    #[test]
    fn test_highlighted_win() {
        let mut p = processor().with_highlight(true);
        run(&mut p, "GAME 3, user W, user B");
        let mut last = String::new();
        for mv in ["0 0", "2 2", "0 1", "2 1", "1 0", "2 0", "1 1"] {
            last = run(&mut p, &format!("MOVE {}", mv));
        }
        assert_eq!(last.matches("\x1b[1;7m").count(), 4);
    }

    #[test]
    fn test_draw_output() {
        let mut p = processor();
        run(&mut p, "GAME 3, user W, user B");
        let mut output = Vec::new();
        for mv in ["0,0", "0,1", "1,0", "0,2", "2,0", "1,1", "1,2", "2,1", "2,2"] {
            output.push(run(&mut p, &format!("MOVE {}", mv)));
        }
        assert!(output.last().unwrap().ends_with("Game finished. Draw"));
        assert!(!p.game().is_active());
    }

    #[test]
    fn test_computer_first_move() {
        let mut p = processor();
        let out = run(&mut p, "GAME 3, comp W, user B");
        assert!(out.starts_with("New game started\nW ("));
        let board = p.game().board().unwrap();
        assert_eq!(board.cells_of(Color::White).len(), 1);
    }

    #[test]
    fn test_comp_vs_comp_runs_to_the_end() {
        let mut p = processor();
        let out = run(&mut p, "GAME 4, comp W, comp B");
        assert!(out.starts_with("New game started"));
        assert!(out.contains("Game finished"));
        assert!(!p.game().is_active());
    }

    #[test]
    fn test_replayed_boards_grow_one_stone_at_a_time() {
        let mut p = processor();
        let reply = p.process("GAME 3, comp W, comp B");
        let mut boards = 0;
        for (idx, line) in reply.lines.iter().enumerate() {
            if line != "Current board state:" {
                continue;
            }
            boards += 1;
            let stones: usize = reply.lines[idx + 2..idx + 5]
                .iter()
                .map(|row| row[1..].chars().filter(|ch| *ch == 'W' || *ch == 'B').count())
                .sum();
            assert_eq!(stones, boards);
        }
        let final_stones = 9 - p.game().board().unwrap().empty_cells().len();
        assert_eq!(boards, final_stones);
    }

    #[test]
    fn test_help_and_exit() {
        let mut p = processor();
        let help = p.process("help");
        assert_eq!(help.lines.first().map(String::as_str), Some("Available commands:"));
        assert!(!help.exit);
        assert_eq!(help.lines.len(), HELP_TEXT.lines().count());

        let exit = p.process("EXIT");
        assert!(exit.exit);
        assert!(exit.lines.is_empty());

        assert_eq!(run(&mut p, "EXIT now"), "Incorrect command");
    }
}
