use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tictactoe::board::Mark;
use tictactoe::config::{GameConfig, DEFAULT_MAX_INVALID_MOVES};
use tictactoe::players::{FirstAvailablePlayer, HumanPlayer, Player, RandomPlayer, ValueEstimatePlayer};
use tictactoe::value_table::{self, ValueTable};
use tictactoe::{Game, GameOutcome};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PlayerKind {
    Human,
    First,
    Random,
    Value,
}

#[derive(Debug, Parser)]
#[command(name = "tictactoe", about = "Tic Tac Toe in the terminal")]
struct Cli {
    /// Who plays X (moves first).
    #[arg(long, value_enum, default_value_t = PlayerKind::Human)]
    player_x: PlayerKind,

    /// Who plays O.
    #[arg(long, value_enum, default_value_t = PlayerKind::First)]
    player_o: PlayerKind,

    /// Log every move and the board after it.
    #[arg(long)]
    debug: bool,

    /// Seed for random players.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = DEFAULT_MAX_INVALID_MOVES)]
    max_invalid_moves: u32,

    /// Write the enumerated value table to DIR and exit.
    #[arg(long, value_name = "DIR")]
    dump_values: Option<PathBuf>,
}

fn seed_offset(mark: Mark) -> u64 {
    match mark {
        Mark::Cross => 0,
        _ => 1,
    }
}

fn build_player(kind: PlayerKind, mark: Mark, config: &GameConfig) -> Box<dyn Player> {
    match kind {
        PlayerKind::Human => Box::new(HumanPlayer::stdin("Human", mark)),
        PlayerKind::First => Box::new(FirstAvailablePlayer::new(mark)),
        PlayerKind::Random => Box::new(RandomPlayer::new(
            mark,
            config.seed.map(|seed| seed.wrapping_add(seed_offset(mark))),
        )),
        PlayerKind::Value => Box::new(ValueEstimatePlayer::new(mark, config.initial_value)),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    let config = GameConfig {
        debug: cli.debug,
        max_invalid_moves: cli.max_invalid_moves,
        seed: cli.seed,
        ..GameConfig::default()
    };

    if let Some(dir) = &cli.dump_values {
        let table = ValueTable::enumerate(config.initial_value);
        let (json, pickle) = value_table::to_disk(dir, &table)
            .with_context(|| format!("writing value table to {}", dir.display()))?;
        println!("{} states written to {} and {}", table.len(), json.display(), pickle.display());
        return Ok(());
    }

    let mut player_x = build_player(cli.player_x, Mark::Cross, &config);
    let mut player_o = build_player(cli.player_o, Mark::Nought, &config);
    println!("Tic Tac Toe");
    println!("Player 1: {} is {}", player_x.get_name(), player_x.get_mark());
    println!("Player 2: {} is {}", player_o.get_name(), player_o.get_mark());

    let mut game = Game::new(config);
    let outcome = game.play(player_x.as_mut(), player_o.as_mut())?;
    print!("{game}");
    match outcome {
        GameOutcome::Won(mark) => println!("{mark} won! Game Over"),
        GameOutcome::Tied => println!("Tie! Game Over"),
        GameOutcome::Abandoned(mark) => println!("{mark} quit. Game Over"),
    }
    info!(moves = ?game.history(), "finished");
    Ok(())
}
