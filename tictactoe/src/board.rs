use crate::error::GameError;
use itertools::Itertools;
use ndarray::prelude::*;
use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Content of a single cell, doubling as a player's identity.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Mark {
    #[default]
    Empty,
    /// Mark A, moves first.
    Cross,
    /// Mark B.
    Nought,
}

impl Mark {
    pub fn other(self) -> Self {
        match self {
            Self::Cross => Mark::Nought,
            Self::Nought => Mark::Cross,
            Self::Empty => Mark::Empty,
        }
    }
    pub fn as_char(self) -> char {
        match self {
            Self::Cross => 'X',
            Self::Nought => 'O',
            Self::Empty => ' ',
        }
    }
    fn key_char(self) -> char {
        match self {
            Self::Empty => '-',
            other => other.as_char(),
        }
    }
    fn from_key_char(c: char) -> Option<Self> {
        match c {
            '-' => Some(Self::Empty),
            'X' => Some(Self::Cross),
            'O' => Some(Self::Nought),
            _ => None,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Maps a 1-9 position to its `(row, col)` cell.
pub fn position_to_cell(position: usize) -> Option<(usize, usize)> {
    (1..=9)
        .contains(&position)
        .then(|| ((position - 1) / 3, (position - 1) % 3))
}

/// The 3x3 grid plus whose move is next.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardState {
    cells: Array2<Mark>,
    turn: Mark,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardState {
    pub fn new() -> Self {
        BoardState {
            cells: Array::from_elem((3, 3), Mark::Empty),
            turn: Mark::Cross,
        }
    }

    /// # Panics
    ///
    /// Panics if `row` or `col` is outside `0..3`.
    pub fn cell_at(&self, row: usize, col: usize) -> Mark {
        self.cells[[row, col]]
    }

    /// Writes a cell without checking what was there before.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is outside `0..3`.
    pub fn set_cell(&mut self, row: usize, col: usize, mark: Mark) {
        self.cells[[row, col]] = mark;
    }

    pub fn turn(&self) -> Mark {
        self.turn
    }

    pub fn set_turn(&mut self, turn: Mark) {
        self.turn = turn;
    }

    pub fn cells(&self) -> ArrayView2<'_, Mark> {
        self.cells.view()
    }

    /// True if `position` is on the board and its cell is empty.
    pub fn is_empty_at(&self, position: usize) -> bool {
        position_to_cell(position).is_some_and(|(row, col)| self.cell_at(row, col) == Mark::Empty)
    }

    /// Empty positions, ascending from 1.
    pub fn available_moves(&self) -> Vec<usize> {
        (1..=9).filter(|&p| self.is_empty_at(p)).collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&mark| mark != Mark::Empty)
    }

    pub fn to_canonical_form(&self) -> StateKey {
        let mut grid = [[Mark::Empty; 3]; 3];
        for ((row, col), &mark) in self.cells.indexed_iter() {
            grid[row][col] = mark;
        }
        StateKey(grid)
    }

    /// Restores the cells from `key`; `turn` is left untouched.
    pub fn from_canonical_form(&mut self, key: &StateKey) {
        for (row, marks) in key.0.iter().enumerate() {
            for (col, &mark) in marks.iter().enumerate() {
                self.cells[[row, col]] = mark;
            }
        }
    }

    /// Scans rows, then columns, then the main and anti diagonal, and
    /// reports the first line held by a single mark.
    pub fn check_win(&self) -> (bool, Mark) {
        let anti_diagonal = [self.cells[[0, 2]], self.cells[[1, 1]], self.cells[[2, 0]]];
        let owner = self
            .cells
            .rows()
            .into_iter()
            .find_map(|row| line_owner(row.iter()))
            .or_else(|| {
                self.cells
                    .columns()
                    .into_iter()
                    .find_map(|column| line_owner(column.iter()))
            })
            .or_else(|| line_owner(self.cells.diag().iter()))
            .or_else(|| line_owner(anti_diagonal.iter()));
        match owner {
            Some(mark) => (true, mark),
            None => (false, Mark::Empty),
        }
    }

    pub fn check_tie(&self) -> bool {
        self.is_full() && !self.check_win().0
    }
}

fn line_owner<'a>(mut line: impl Iterator<Item = &'a Mark>) -> Option<Mark> {
    let first = *line.next()?;
    (first != Mark::Empty && line.all(|&mark| mark == first)).then_some(first)
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rows = self
            .cells
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|mark| mark.as_char()).join("|"))
            .join("\n-----\n");
        writeln!(f, "{rows}")
    }
}

/// Turn-independent snapshot of a grid, used as a lookup key.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct StateKey([[Mark; 3]; 3]);

impl StateKey {
    pub fn cell(&self, row: usize, col: usize) -> Mark {
        self.0[row][col]
    }
}

impl From<&BoardState> for StateKey {
    fn from(board: &BoardState) -> Self {
        board.to_canonical_form()
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.iter().flatten().map(|mark| mark.key_char()).collect::<String>())
    }
}

impl FromStr for StateKey {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GameError::InvalidStateKey(s.to_owned());
        let marks: Vec<Mark> = s
            .chars()
            .map(Mark::from_key_char)
            .collect::<Option<_>>()
            .ok_or_else(invalid)?;
        if marks.len() != 9 {
            return Err(invalid());
        }
        let mut grid = [[Mark::Empty; 3]; 3];
        for (i, mark) in marks.into_iter().enumerate() {
            grid[i / 3][i % 3] = mark;
        }
        Ok(StateKey(grid))
    }
}

impl Serialize for StateKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StateKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct KeyVisitor;
        impl<'de> Visitor<'de> for KeyVisitor {
            type Value = StateKey;
            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a 9 character board key")
            }
            fn visit_str<E>(self, value: &str) -> Result<StateKey, E>
            where
                E: de::Error,
            {
                value.parse().map_err(de::Error::custom)
            }
        }
        deserializer.deserialize_str(KeyVisitor)
    }
}
