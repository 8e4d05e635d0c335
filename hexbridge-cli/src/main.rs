//! hexbridge CLI - Hex bot speaking a line protocol on stdin/stdout
//!
//! Commands (one per line):
//! - init_board <n>, show_board, check_win, quit
//! - make_move, swap
//! - seto <cell>, sety <cell>, unset <cell>
//!
//! Logs go to stderr; stdout carries protocol replies only.

mod protocol;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hexbridge_core::{Bot, EngineConfig, Player};

use protocol::Session;

#[derive(Parser)]
#[command(name = "hexbridge")]
#[command(about = "Hex bot built on two-bridge tracking and least-cost paths")]
struct Cli {
    /// Colour the bot plays (white connects top-bottom, black left-right)
    #[arg(long)]
    color: Player,

    /// Board side length (overrides the config file)
    #[arg(long)]
    size: Option<u8>,

    /// Engine config JSON file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load engine config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(size) = cli.size {
        config = config.with_board_size(size);
    }

    let bot = Bot::new(cli.color, config).context("Invalid engine configuration")?;
    tracing::info!(color = %bot.color(), size = bot.engine().board().size(), "hexbridge ready");

    let stdout = io::stdout();
    let mut session = Session::new(bot, stdout.lock());
    session.run(io::stdin().lock())
}
