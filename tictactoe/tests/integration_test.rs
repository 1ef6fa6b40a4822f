use std::io::Cursor;
use tictactoe::board::{BoardState, Mark};
use tictactoe::config::GameConfig;
use tictactoe::error::GameError;
use tictactoe::players::{FirstAvailablePlayer, HumanPlayer, Player, RandomPlayer};
use tictactoe::{Game, GameOutcome, GameStatus};

struct MustNotBeAsked(Mark);

impl Player for MustNotBeAsked {
    fn set_mark(&mut self, mark: Mark) {
        self.0 = mark;
    }
    fn get_mark(&self) -> Mark {
        self.0
    }
    fn get_name(&self) -> &str {
        "bystander"
    }
    fn choose_move(&mut self, _board: &BoardState) -> Result<usize, GameError> {
        panic!("asked to move after the game was decided");
    }
}

#[test]
fn human_beats_first_available() {
    // The repeated 1 is taken by then and gets asked again.
    let input = Cursor::new("5\n1\n9\n3\n7\n");
    let mut human = HumanPlayer::new("Oscar", Mark::Cross, input, Vec::new());
    let mut bot = FirstAvailablePlayer::new(Mark::Nought);
    let mut game = Game::default();

    let outcome = game.play(&mut human, &mut bot).unwrap();
    assert_eq!(outcome, GameOutcome::Won(Mark::Cross));
    assert_eq!(game.history(), &[5, 1, 9, 2, 3, 4, 7]);

    let transcript = String::from_utf8(human.into_output()).unwrap();
    assert_eq!(transcript.matches("Oscar (X), enter position").count(), 5);
}

#[test]
fn human_can_quit() {
    let mut bot = FirstAvailablePlayer::new(Mark::Cross);
    let mut human = HumanPlayer::new("Oscar", Mark::Nought, Cursor::new("quit\n"), Vec::new());
    let mut game = Game::default();

    let outcome = game.play(&mut bot, &mut human).unwrap();
    assert_eq!(outcome, GameOutcome::Abandoned(Mark::Nought));
    assert_eq!(game.history(), &[1]);
    assert_eq!(game.status(), GameStatus::InProgress);
}

#[test]
fn garbage_input_counts_as_invalid_move() {
    let config = GameConfig {
        max_invalid_moves: 1,
        ..GameConfig::default()
    };
    let input = Cursor::new("x\n-4\n");
    let mut human = HumanPlayer::new("Oscar", Mark::Cross, input, Vec::new());
    let mut bot = FirstAvailablePlayer::new(Mark::Nought);
    let mut game = Game::new(config);

    let err = game.play(&mut human, &mut bot).unwrap_err();
    assert!(matches!(
        err,
        GameError::TooManyInvalidMoves {
            mark: Mark::Cross,
            attempts: 2
        }
    ));
    assert!(game.history().is_empty());
}

#[test]
fn closed_input_stops_the_game() {
    let mut human = HumanPlayer::new("Oscar", Mark::Cross, Cursor::new("5\n"), Vec::new());
    let mut bot = FirstAvailablePlayer::new(Mark::Nought);
    let mut game = Game::default();

    assert!(matches!(
        game.play(&mut human, &mut bot),
        Err(GameError::InputClosed)
    ));
    assert_eq!(game.history(), &[5, 1]);
}

#[test]
fn winning_move_ends_the_round() {
    let mut board = BoardState::new();
    board.set_cell(0, 0, Mark::Cross);
    board.set_cell(1, 0, Mark::Nought);
    board.set_cell(0, 1, Mark::Cross);
    board.set_cell(1, 1, Mark::Nought);
    let mut game = Game::with_board(board, GameConfig::default());
    let mut x = FirstAvailablePlayer::new(Mark::Cross);
    let mut o = MustNotBeAsked(Mark::Nought);

    assert_eq!(game.play(&mut x, &mut o).unwrap(), GameOutcome::Won(Mark::Cross));
    assert_eq!(game.history(), &[3]);
}

#[test]
fn filling_move_ends_the_round() {
    let mut board = BoardState::new();
    for (position, mark) in [
        (1, Mark::Cross),
        (2, Mark::Nought),
        (3, Mark::Cross),
        (4, Mark::Nought),
        (5, Mark::Cross),
        (6, Mark::Cross),
        (7, Mark::Nought),
        (9, Mark::Nought),
    ] {
        board.set_cell((position - 1) / 3, (position - 1) % 3, mark);
    }
    let mut game = Game::with_board(board, GameConfig::default());
    let mut x = FirstAvailablePlayer::new(Mark::Cross);
    let mut o = MustNotBeAsked(Mark::Nought);

    assert_eq!(game.play(&mut x, &mut o).unwrap(), GameOutcome::Tied);
    assert_eq!(game.history(), &[8]);
    assert_eq!(game.status(), GameStatus::Tied);
}

#[test]
fn decided_game_returns_without_asking() {
    let mut board = BoardState::new();
    for (row, col) in [(0, 0), (1, 1), (2, 2)] {
        board.set_cell(row, col, Mark::Nought);
    }
    let mut game = Game::with_board(board, GameConfig::default());
    let mut x = MustNotBeAsked(Mark::Cross);
    let mut o = MustNotBeAsked(Mark::Nought);
    assert_eq!(game.play(&mut x, &mut o).unwrap(), GameOutcome::Won(Mark::Nought));
}

#[test]
fn random_players_always_finish() {
    for seed in 0..100 {
        let mut x = RandomPlayer::new(Mark::Cross, Some(seed));
        let mut o = RandomPlayer::new(Mark::Nought, Some(seed + 1_000));
        let mut game = Game::default();
        let outcome = game.play(&mut x, &mut o).unwrap();

        let (won, mark) = game.board().check_win();
        match outcome {
            GameOutcome::Won(winner) => assert!(won && mark == winner),
            GameOutcome::Tied => assert!(game.board().check_tie()),
            GameOutcome::Abandoned(_) => panic!("bots never quit"),
        }
        assert!(game.history().len() >= 5 && game.history().len() <= 9);
    }
}
