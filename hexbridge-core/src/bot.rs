//! One side of a game, addressed with coordinate labels

use std::fmt;

use crate::color::Player;
use crate::config::EngineConfig;
use crate::coord::Coord;
use crate::engine::MoveEngine;
use crate::error::HexError;

/// Game outcome from the bot's point of view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
    Undecided,
}

impl Outcome {
    /// Protocol code: 1 won, -1 lost, 0 undecided
    pub fn code(self) -> i8 {
        match self {
            Outcome::Won => 1,
            Outcome::Lost => -1,
            Outcome::Undecided => 0,
        }
    }
}

/// A bot playing one colour
#[derive(Clone, Debug)]
pub struct Bot {
    engine: MoveEngine,
    config: EngineConfig,
    color: Player,
}

impl Bot {
    pub fn new(color: Player, config: EngineConfig) -> Result<Self, HexError> {
        Ok(Self {
            engine: MoveEngine::with_config(&config)?,
            config,
            color,
        })
    }

    pub fn color(&self) -> Player {
        self.color
    }

    pub fn engine(&self) -> &MoveEngine {
        &self.engine
    }

    /// Start a new game on an empty board of `size`
    pub fn init_board(&mut self, size: u8) -> Result<(), HexError> {
        let config = self.config.clone().with_board_size(size);
        self.engine = MoveEngine::with_config(&config)?;
        self.config = config;
        tracing::info!(size, color = %self.color, "new game");
        Ok(())
    }

    fn parse(&self, label: &str) -> Result<Coord, HexError> {
        Coord::parse(label, self.engine.board().size())
    }

    /// Record an opponent move
    pub fn seto(&mut self, label: &str) -> Result<bool, HexError> {
        let coord = self.parse(label)?;
        Ok(self.engine.place(coord, self.color.opponent()))
    }

    /// Record a move of our own
    pub fn sety(&mut self, label: &str) -> Result<bool, HexError> {
        let coord = self.parse(label)?;
        Ok(self.engine.place(coord, self.color))
    }

    /// Take a stone back
    pub fn unset(&mut self, label: &str) -> Result<bool, HexError> {
        let coord = self.parse(label)?;
        Ok(self.engine.remove(coord))
    }

    /// Exchange colours with the opponent. Only legal right after the first
    /// move, and counts as a move itself.
    pub fn swap(&mut self) -> bool {
        if self.engine.move_count() != 1 {
            return false;
        }
        self.color = self.color.opponent();
        self.engine.record_swap();
        tracing::info!(color = %self.color, "swapped colours");
        true
    }

    /// Choose a move, play it, and return it
    pub fn make_move(&mut self) -> Result<Coord, HexError> {
        let coord = self.engine.best_move(self.color)?;
        self.engine.place(coord, self.color);
        Ok(coord)
    }

    pub fn check_win(&self) -> Outcome {
        match self.engine.winner() {
            None => Outcome::Undecided,
            Some(winner) if winner == self.color => Outcome::Won,
            Some(_) => Outcome::Lost,
        }
    }
}

impl fmt::Display for Bot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Playing as: {}", self.color)?;
        writeln!(f, "Move count: {}", self.engine.move_count())?;
        write!(f, "{}", self.engine.board())
    }
}
