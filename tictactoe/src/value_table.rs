use crate::board::{position_to_cell, BoardState, StateKey};
use chrono::offset::Local;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fs::File;
use std::io::{prelude::*, BufReader, BufWriter};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Number of distinct grids reachable from the empty board when play
/// stops at the first win or a full board.
pub const REACHABLE_STATES: usize = 5478;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ValueTable {
    values: HashMap<StateKey, f32>,
}

impl Deref for ValueTable {
    type Target = HashMap<StateKey, f32>;
    fn deref(&self) -> &<Self as Deref>::Target {
        &self.values
    }
}

impl DerefMut for ValueTable {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.values
    }
}

impl ValueTable {
    pub fn new() -> Self {
        ValueTable {
            values: HashMap::with_capacity(REACHABLE_STATES),
        }
    }

    /// Breadth-first walk from the empty board, Cross and Nought placing in
    /// turn. Every grid is visited once and terminal grids are not expanded.
    #[instrument]
    pub fn enumerate(initial_value: f32) -> Self {
        let mut table = ValueTable::new();
        let mut frontier = VecDeque::new();
        let start = BoardState::new();
        table.insert(start.to_canonical_form(), initial_value);
        frontier.push_back(start);

        while let Some(board) = frontier.pop_front() {
            if board.check_win().0 || board.check_tie() {
                continue;
            }
            for position in board.available_moves() {
                let Some((row, col)) = position_to_cell(position) else {
                    continue;
                };
                let mut next = board.clone();
                next.set_cell(row, col, board.turn());
                next.set_turn(board.turn().other());
                let key = next.to_canonical_form();
                if table.contains_key(&key) {
                    continue;
                }
                table.insert(key, initial_value);
                frontier.push_back(next);
            }
        }
        debug!(states = table.len(), "enumerated reachable states");
        table
    }

    pub fn value_of(&self, board: &BoardState) -> Option<f32> {
        self.get(&board.to_canonical_form()).copied()
    }
}

/// Writes `values-<date>.json` and `values-<date>.pickle` into `path`.
pub fn to_disk(path: &Path, table: &ValueTable) -> Result<(PathBuf, PathBuf), anyhow::Error> {
    let today = Local::now().date_naive();
    let json_path = path.join(format!("values-{today}.json"));
    let pickle_path = path.join(format!("values-{today}.pickle"));

    let mut file_json = BufWriter::new(File::create(&json_path)?);
    serde_json::to_writer(&mut file_json, table)?;
    file_json.flush()?;

    let mut file = BufWriter::new(File::create(&pickle_path)?);
    serde_pickle::to_writer(&mut file, table, serde_pickle::SerOptions::new())?;
    file.flush()?;

    info!(json = %json_path.display(), pickle = %pickle_path.display(), states = table.len(), "value table saved");
    Ok((json_path, pickle_path))
}

pub fn from_disk_pickle(file: &Path) -> Result<ValueTable, anyhow::Error> {
    let mut reader = BufReader::new(File::open(file)?);
    let mut buf: Vec<u8> = vec![];
    reader.read_to_end(&mut buf)?;
    let decoded: ValueTable = serde_pickle::from_slice(&buf, serde_pickle::DeOptions::new())?;
    Ok(decoded)
}

pub fn from_disk_json(file: &Path) -> Result<ValueTable, anyhow::Error> {
    let reader = BufReader::new(File::open(file)?);
    let decoded: ValueTable = serde_json::from_reader(reader)?;
    Ok(decoded)
}
