use crate::board::{position_to_cell, BoardState, Mark};
use crate::config::GameConfig;
use crate::error::{GameError, MoveRejection};
use crate::players::Player;
use std::fmt;
use tracing::{debug, info, instrument, warn};

pub mod board;
pub mod config;
pub mod error;
pub mod players;
pub mod value_table;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GameStatus {
    InProgress,
    Won(Mark),
    Tied,
}

/// How a call to `Game::play` ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GameOutcome {
    Won(Mark),
    Tied,
    /// The player holding this mark quit.
    Abandoned(Mark),
}

/// One match: a board, the winner once known, and the positions played.
#[derive(Debug, Clone)]
pub struct Game {
    board: BoardState,
    winner: Mark,
    history: Vec<usize>,
    config: GameConfig,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self::with_board(BoardState::new(), config)
    }

    /// Starts from an arbitrary position, e.g. a puzzle or a test fixture.
    pub fn with_board(board: BoardState, config: GameConfig) -> Self {
        let mut game = Game {
            board,
            winner: Mark::Empty,
            history: Vec::new(),
            config,
        };
        game.check_win();
        game
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn winner(&self) -> Mark {
        self.winner
    }

    pub fn history(&self) -> &[usize] {
        &self.history
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Places the mark whose turn it is at `position` (1-9) and passes the turn.
    /// On error the board and turn are unchanged.
    pub fn apply_move(&mut self, position: usize) -> Result<(), GameError> {
        let reject = |reason| GameError::InvalidMove { position, reason };
        if self.status() != GameStatus::InProgress {
            return Err(reject(MoveRejection::GameOver));
        }
        let (row, col) = position_to_cell(position).ok_or_else(|| reject(MoveRejection::OutOfRange))?;
        if self.board.cell_at(row, col) != Mark::Empty {
            return Err(reject(MoveRejection::Occupied));
        }
        let mark = self.board.turn();
        self.board.set_cell(row, col, mark);
        self.board.set_turn(mark.other());
        self.history.push(position);
        debug!(%mark, position, "move applied");
        if self.config.debug {
            info!("\n{}", self.board);
        }
        Ok(())
    }

    /// Records the winner if a line is complete.
    pub fn check_win(&mut self) -> bool {
        let (won, mark) = self.board.check_win();
        if won {
            self.winner = mark;
        }
        won
    }

    pub fn check_tie(&self) -> bool {
        self.board.check_tie()
    }

    pub fn status(&self) -> GameStatus {
        match self.board.check_win() {
            (true, mark) => GameStatus::Won(mark),
            _ if self.board.check_tie() => GameStatus::Tied,
            _ => GameStatus::InProgress,
        }
    }

    /// Drives the game to a win or tie, asking whichever player holds the
    /// mark whose turn it is. The game is checked after every single move,
    /// so the opponent is never asked once the mover has ended it.
    #[instrument(skip_all, fields(a = player_a.get_name(), b = player_b.get_name()))]
    pub fn play(
        &mut self,
        player_a: &mut dyn Player,
        player_b: &mut dyn Player,
    ) -> Result<GameOutcome, GameError> {
        let (mark_a, mark_b) = (player_a.get_mark(), player_b.get_mark());
        if mark_a == mark_b {
            return Err(GameError::SameMark(mark_a));
        }
        if mark_a == Mark::Empty {
            return Err(GameError::UnassignedMark(player_a.get_name().to_owned()));
        }
        if mark_b == Mark::Empty {
            return Err(GameError::UnassignedMark(player_b.get_name().to_owned()));
        }
        info!(
            "{} is {}, {} is {}",
            player_a.get_name(),
            mark_a,
            player_b.get_name(),
            mark_b
        );

        loop {
            if self.check_win() {
                info!(winner = %self.winner, "{} won! Game Over", self.winner);
                return Ok(GameOutcome::Won(self.winner));
            }
            if self.check_tie() {
                info!("Tie! Game Over");
                return Ok(GameOutcome::Tied);
            }
            let turn = self.board.turn();
            debug!(%turn, "{turn}'s turn");
            let result = if mark_a == turn {
                self.take_turn(player_a)
            } else {
                self.take_turn(player_b)
            };
            match result {
                Ok(()) => {}
                Err(GameError::Quit) => {
                    info!(%turn, "player quit");
                    return Ok(GameOutcome::Abandoned(turn));
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Asks `player` until it produces a legal move, allowing
    /// `max_invalid_moves` retries.
    fn take_turn(&mut self, player: &mut dyn Player) -> Result<(), GameError> {
        let mut failures = 0;
        loop {
            let attempt = player
                .choose_move(&self.board)
                .and_then(|position| self.apply_move(position));
            match attempt {
                Ok(()) => return Ok(()),
                Err(err) if err.is_retryable() => {
                    failures += 1;
                    warn!(player = player.get_name(), failures, "{err}");
                    if failures > self.config.max_invalid_moves {
                        return Err(GameError::TooManyInvalidMoves {
                            mark: player.get_mark(),
                            attempts: failures,
                        });
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}
