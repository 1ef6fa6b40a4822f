use crate::board::{BoardState, Mark};
use crate::error::GameError;
use crate::value_table::ValueTable;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::io::{self, BufRead, Read, Stdout, Write};
use tracing::debug;

/// Returned by bots when the board has no empty cell left.
pub const NO_MOVE: usize = 0;

pub trait Player {
    fn set_mark(&mut self, mark: Mark);
    fn get_mark(&self) -> Mark;
    fn get_name(&self) -> &str;
    /// Picks a position 1-9 for the mark whose turn it is on `board`.
    fn choose_move(&mut self, board: &BoardState) -> Result<usize, GameError>;
}

/// Reads positions line by line from `input`, prompting on `output`.
#[derive(Debug)]
pub struct HumanPlayer<R, W> {
    pub name: String,
    pub mark: Mark,
    input: R,
    output: W,
}

#[derive(Debug)]
pub struct FirstAvailablePlayer {
    pub name: String,
    pub mark: Mark,
}

#[derive(Debug)]
pub struct RandomPlayer {
    pub name: String,
    pub mark: Mark,
    rng: StdRng,
}

/// Holds a value for every reachable grid but has no policy on top of it
/// yet, so asking it for a move fails.
#[derive(Debug)]
pub struct ValueEstimatePlayer {
    pub name: String,
    pub mark: Mark,
    values: ValueTable,
}

/// Hands out stdin one line at a time, locking it only for that read, so
/// several human players can share the terminal.
#[derive(Debug, Default)]
pub struct StdinLines {
    line: String,
    pos: usize,
}

impl Read for StdinLines {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl BufRead for StdinLines {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos >= self.line.len() {
            self.line.clear();
            self.pos = 0;
            io::stdin().lock().read_line(&mut self.line)?;
        }
        Ok(&self.line.as_bytes()[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.line.len());
    }
}

impl HumanPlayer<StdinLines, Stdout> {
    pub fn stdin(name: impl Into<String>, mark: Mark) -> Self {
        Self::new(name, mark, StdinLines::default(), io::stdout())
    }
}

impl<R: BufRead, W: Write> HumanPlayer<R, W> {
    pub fn new(name: impl Into<String>, mark: Mark, input: R, output: W) -> Self {
        HumanPlayer {
            name: name.into(),
            mark,
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

/// Interprets one line of human input.
pub fn parse_position(line: &str) -> Result<usize, GameError> {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
        return Err(GameError::Quit);
    }
    trimmed
        .parse::<usize>()
        .map_err(|_| GameError::InvalidInput(trimmed.to_owned()))
}

impl<R: BufRead, W: Write> Player for HumanPlayer<R, W> {
    fn set_mark(&mut self, mark: Mark) {
        self.mark = mark;
    }
    fn get_mark(&self) -> Mark {
        self.mark
    }
    fn get_name(&self) -> &str {
        &self.name
    }
    fn choose_move(&mut self, board: &BoardState) -> Result<usize, GameError> {
        write!(self.output, "{board}")?;
        writeln!(self.output, "{} ({}), enter position (1-9) or q to quit:", self.name, self.mark)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(GameError::InputClosed);
        }
        parse_position(&line)
    }
}

impl FirstAvailablePlayer {
    pub fn new(mark: Mark) -> Self {
        FirstAvailablePlayer {
            name: "Dumb - I play the next available position".to_owned(),
            mark,
        }
    }
}

impl Player for FirstAvailablePlayer {
    fn set_mark(&mut self, mark: Mark) {
        self.mark = mark;
    }
    fn get_mark(&self) -> Mark {
        self.mark
    }
    fn get_name(&self) -> &str {
        &self.name
    }
    fn choose_move(&mut self, board: &BoardState) -> Result<usize, GameError> {
        let position = (1..=9).find(|&p| board.is_empty_at(p)).unwrap_or(NO_MOVE);
        debug!(mark = %self.mark, position, "first available");
        Ok(position)
    }
}

impl RandomPlayer {
    pub fn new(mark: Mark, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        RandomPlayer {
            name: "Random".to_owned(),
            mark,
            rng,
        }
    }
}

impl Player for RandomPlayer {
    fn set_mark(&mut self, mark: Mark) {
        self.mark = mark;
    }
    fn get_mark(&self) -> Mark {
        self.mark
    }
    fn get_name(&self) -> &str {
        &self.name
    }
    fn choose_move(&mut self, board: &BoardState) -> Result<usize, GameError> {
        let position = board
            .available_moves()
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(NO_MOVE);
        debug!(mark = %self.mark, position, "random pick");
        Ok(position)
    }
}

impl ValueEstimatePlayer {
    pub fn new(mark: Mark, initial_value: f32) -> Self {
        ValueEstimatePlayer {
            name: "Value estimate".to_owned(),
            mark,
            values: ValueTable::enumerate(initial_value),
        }
    }

    pub fn values(&self) -> &ValueTable {
        &self.values
    }

    pub fn estimate(&self, board: &BoardState) -> Option<f32> {
        self.values.value_of(board)
    }
}

impl Player for ValueEstimatePlayer {
    fn set_mark(&mut self, mark: Mark) {
        self.mark = mark;
    }
    fn get_mark(&self) -> Mark {
        self.mark
    }
    fn get_name(&self) -> &str {
        &self.name
    }
    fn choose_move(&mut self, _board: &BoardState) -> Result<usize, GameError> {
        Err(GameError::UnimplementedStrategy(self.name.clone()))
    }
}
