//! Line protocol - one command per line, replies on the output stream
//!
//! ## Architecture
//!
//! - Level 1: Session::run() - read loop
//! - Level 2: Command::parse(), Session::execute()
//! - Level 3: Bot verbs from hexbridge-core

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use hexbridge_core::{Bot, HexError};

// ============================================================================
// COMMANDS
// ============================================================================

/// A parsed protocol command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    InitBoard(u8),
    ShowBoard,
    MakeMove,
    Swap,
    SetOpponent(String),
    SetOwn(String),
    Unset(String),
    CheckWin,
    Quit,
}

/// Why a line was not a command
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty line")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("{command} expects {expected} argument(s), got {got}")]
    WrongArity {
        command: String,
        expected: usize,
        got: usize,
    },
    #[error("invalid board size: {0}")]
    BadSize(String),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(ParseError::Empty)?;
        let args: Vec<&str> = words.collect();

        let expected = arity(name).ok_or_else(|| ParseError::Unknown(name.to_string()))?;
        if args.len() != expected {
            return Err(ParseError::WrongArity {
                command: name.to_string(),
                expected,
                got: args.len(),
            });
        }

        let command = match name {
            "init_board" => {
                let size = args[0]
                    .parse()
                    .map_err(|_| ParseError::BadSize(args[0].to_string()))?;
                Command::InitBoard(size)
            }
            "seto" => Command::SetOpponent(args[0].to_string()),
            "sety" => Command::SetOwn(args[0].to_string()),
            "unset" => Command::Unset(args[0].to_string()),
            "show_board" => Command::ShowBoard,
            "make_move" => Command::MakeMove,
            "swap" => Command::Swap,
            "check_win" => Command::CheckWin,
            "quit" => Command::Quit,
            _ => return Err(ParseError::Unknown(name.to_string())),
        };
        Ok(command)
    }
}

/// Number of arguments a command takes, `None` for unknown names
fn arity(name: &str) -> Option<usize> {
    match name {
        "init_board" | "seto" | "sety" | "unset" => Some(1),
        "show_board" | "make_move" | "swap" | "check_win" | "quit" => Some(0),
        _ => None,
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// Whether the read loop should keep going
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

pub struct Session<W: Write> {
    bot: Bot,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(bot: Bot, out: W) -> Self {
        Self { bot, out }
    }

    #[cfg(test)]
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    /// Serve commands until `quit` or end of input
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        for line in input.lines() {
            let line = line.context("Failed to read command")?;
            if line.trim().is_empty() {
                continue;
            }
            match Command::parse(&line) {
                Ok(command) => {
                    if self.execute(command)? == Flow::Stop {
                        break;
                    }
                }
                Err(e) => tracing::warn!(line = %line.trim(), "ignored: {}", e),
            }
        }
        Ok(())
    }

    /// Run one command. Rejected moves are logged, a move request on a full
    /// board is an error.
    pub fn execute(&mut self, command: Command) -> Result<Flow> {
        tracing::debug!(?command, "command");
        match command {
            Command::InitBoard(size) => {
                if let Err(e) = self.bot.init_board(size) {
                    tracing::warn!("init_board rejected: {}", e);
                }
            }
            Command::ShowBoard => {
                writeln!(self.out, "{}", self.bot)?;
            }
            Command::MakeMove => {
                let coord = self
                    .bot
                    .make_move()
                    .context("No move available")?;
                writeln!(self.out, "{}", coord)?;
            }
            Command::Swap => {
                if !self.bot.swap() {
                    tracing::warn!("swap is only legal after the first move");
                }
            }
            Command::SetOpponent(label) => {
                let placed = self.bot.seto(&label);
                report("seto", &label, placed);
            }
            Command::SetOwn(label) => {
                let placed = self.bot.sety(&label);
                report("sety", &label, placed);
            }
            Command::Unset(label) => {
                let removed = self.bot.unset(&label);
                report("unset", &label, removed);
            }
            Command::CheckWin => {
                writeln!(self.out, "{}", self.bot.check_win().code())?;
            }
            Command::Quit => return Ok(Flow::Stop),
        }
        self.out.flush()?;
        Ok(Flow::Continue)
    }
}

fn report(verb: &str, label: &str, result: Result<bool, HexError>) {
    match result {
        Ok(true) => {}
        Ok(false) => tracing::warn!(verb, label, "cell unchanged"),
        Err(e) => tracing::warn!(verb, label, "{}", e),
    }
}
