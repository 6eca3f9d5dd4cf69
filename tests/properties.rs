use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use squares_engine::engine::{Board, Cell, Color, Coord, Game, GameStatus, Player};
use squares_engine::heuristics::choose_move;
use squares_engine::squares::find_completed_square;
use squares_engine::utils::board_from_data;

/// Random boards of size 3..=6 with every cell independently empty, White or Black.
fn arbitrary_board() -> impl Strategy<Value = Board> {
    (3usize..=6).prop_flat_map(|size| {
        prop::collection::vec(prop::sample::select(vec!['.', '.', 'W', 'B']), size * size)
            .prop_map(move |cells| {
                let data: String = cells.into_iter().collect();
                board_from_data(size, &data).unwrap()
            })
    })
}

fn dist2(a: Coord, b: Coord) -> i64 {
    let dr = a.0 as i64 - b.0 as i64;
    let dc = a.1 as i64 - b.1 as i64;
    dr * dr + dc * dc
}

/// Four distinct points form a square iff their six pairwise squared distances
/// are four equal sides `s > 0` and two diagonals `2s`.
fn is_square(points: [Coord; 4]) -> bool {
    let mut d = Vec::with_capacity(6);
    for i in 0..4 {
        for j in (i + 1)..4 {
            d.push(dist2(points[i], points[j]));
        }
    }
    d.sort_unstable();
    d[0] > 0 && d[0] == d[3] && d[4] == d[5] && d[4] == 2 * d[0]
}

fn brute_force_has_square(board: &Board, color: Color) -> bool {
    let cells = board.cells_of(color);
    let n = cells.len();
    for a in 0..n {
        for b in (a + 1)..n {
            for c in (b + 1)..n {
                for d in (c + 1)..n {
                    if is_square([cells[a], cells[b], cells[c], cells[d]]) {
                        return true;
                    }
                }
            }
        }
    }
    false
}

proptest! {
    #[test]
    fn prop_completed_square_matches_brute_force(board in arbitrary_board()) {
        for color in [Color::White, Color::Black] {
            let found = find_completed_square(&board, color);
            prop_assert_eq!(found.is_some(), brute_force_has_square(&board, color));
            if let Some(square) = found {
                prop_assert!(is_square(square));
                for (r, c) in square {
                    prop_assert_eq!(board.get(r, c).unwrap(), Cell::Colored(color));
                }
            }
        }
    }

    #[test]
    fn prop_choose_move_picks_empty_cell_unless_full(board in arbitrary_board(), seed in any::<u64>()) {
        let mut board = board;
        let before = board.clone();
        let mut rng = SmallRng::seed_from_u64(seed);
        let choice = choose_move(&mut board, Color::White, Color::Black, &mut rng);
        prop_assert_eq!(&board, &before);
        match choice {
            None => prop_assert!(board.is_full()),
            Some((_, (r, c))) => prop_assert_eq!(board.get(r, c).unwrap(), Cell::Empty),
        }
    }

    #[test]
    fn prop_failed_moves_leave_board_untouched(
        size in 3usize..=5,
        moves in prop::collection::vec((0usize..6, 0usize..6), 1..40),
    ) {
        let mut game = Game::with_seed(0);
        game.start_game(size, Player::human(Color::White), Player::human(Color::Black)).unwrap();
        for (row, col) in moves {
            let before = game.state().cloned();
            if game.apply_move(row, col).is_err() {
                prop_assert_eq!(game.state().cloned(), before);
            }
        }
    }

    #[test]
    fn prop_next_move_tier_is_stable(board in arbitrary_board(), white_next in any::<bool>(), seed in any::<u64>()) {
        let mut game = Game::with_seed(seed);
        let next = if white_next { 'W' } else { 'B' };
        let status = game.load_board(board.size(), &board.to_data_string(), next).unwrap();
        prop_assume!(status == GameStatus::Active);

        let first = game.find_next_move_with_tier().unwrap();
        let second = game.find_next_move_with_tier().unwrap();
        prop_assert_eq!(first.map(|(tier, _)| tier), second.map(|(tier, _)| tier));
        prop_assert!(first.is_some());
    }
}
