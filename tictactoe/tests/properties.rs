//! Property tests for board evaluation and canonical keys.

use proptest::prelude::*;
use tictactoe::board::{BoardState, Mark, StateKey};
use tictactoe::error::{GameError, MoveRejection};
use tictactoe::config::GameConfig;
use tictactoe::Game;

const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

fn arb_mark() -> impl Strategy<Value = Mark> {
    prop_oneof![Just(Mark::Empty), Just(Mark::Cross), Just(Mark::Nought)]
}

fn arb_player_mark() -> impl Strategy<Value = Mark> {
    prop_oneof![Just(Mark::Cross), Just(Mark::Nought)]
}

fn board_from(cells: [Mark; 9], turn: Mark) -> BoardState {
    let mut board = BoardState::new();
    for (i, mark) in cells.into_iter().enumerate() {
        board.set_cell(i / 3, i % 3, mark);
    }
    board.set_turn(turn);
    board
}

fn arb_board() -> impl Strategy<Value = BoardState> {
    (prop::array::uniform9(arb_mark()), arb_player_mark())
        .prop_map(|(cells, turn)| board_from(cells, turn))
}

proptest! {
    #[test]
    fn canonical_form_round_trips(board in arb_board()) {
        let key = board.to_canonical_form();
        let mut restored = BoardState::new();
        restored.set_turn(board.turn().other());
        restored.from_canonical_form(&key);

        prop_assert_eq!(restored.cells(), board.cells());
        prop_assert_eq!(restored.to_canonical_form(), key);
        prop_assert_eq!(key.to_string().parse::<StateKey>().unwrap(), key);
    }

    #[test]
    fn any_complete_line_wins(
        cells in prop::array::uniform9(arb_mark()),
        line in 0usize..8,
        mark in arb_player_mark(),
    ) {
        // Other cells only hold `mark` or nothing, so every line found belongs to it.
        let cells = cells.map(|m| if m == Mark::Empty { m } else { mark });
        let mut board = board_from(cells, Mark::Cross);
        for (row, col) in LINES[line] {
            board.set_cell(row, col, mark);
        }
        prop_assert_eq!(board.check_win(), (true, mark));
        prop_assert!(!board.check_tie());
    }

    #[test]
    fn full_board_is_tie_exactly_without_a_line(
        cells in prop::array::uniform9(arb_player_mark()),
    ) {
        let board = board_from(cells, Mark::Cross);
        let has_line = LINES.into_iter().any(|line| {
            let [a, b, c] = line.map(|(r, col)| board.cell_at(r, col));
            a == b && b == c
        });
        prop_assert_eq!(board.check_win().0, has_line);
        prop_assert_eq!(board.check_tie(), !has_line);
    }

    #[test]
    fn board_with_a_gap_is_never_a_tie(
        cells in prop::array::uniform9(arb_mark()),
        gap in 0usize..9,
    ) {
        let mut cells = cells;
        cells[gap] = Mark::Empty;
        prop_assert!(!board_from(cells, Mark::Cross).check_tie());
    }

    #[test]
    fn occupied_cell_is_never_overwritten(
        position in 1usize..=9,
        mark in arb_player_mark(),
    ) {
        let mut board = BoardState::new();
        board.set_cell((position - 1) / 3, (position - 1) % 3, mark);
        let mut game = Game::with_board(board.clone(), GameConfig::default());

        let rejected = matches!(
            game.apply_move(position),
            Err(GameError::InvalidMove { reason: MoveRejection::Occupied, .. })
        );
        prop_assert!(rejected);
        prop_assert_eq!(game.board(), &board);
        prop_assert_eq!(game.board().turn(), Mark::Cross);
    }
}
