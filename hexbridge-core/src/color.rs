//! Players and cell colours

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::coord::Edge;

/// Player color
///
/// White connects TOP to BOTTOM, Black connects LEFT to RIGHT.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    White = 0,
    Black = 1,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::White, Player::Black];

    pub fn opponent(self) -> Self {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// The (source, target) edges this player must connect
    pub fn edges(self) -> (Edge, Edge) {
        match self {
            Player::White => (Edge::Top, Edge::Bottom),
            Player::Black => (Edge::Left, Edge::Right),
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::White => f.write_str("white"),
            Player::Black => f.write_str("black"),
        }
    }
}

impl FromStr for Player {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "white" | "w" => Ok(Player::White),
            "black" | "b" => Ok(Player::Black),
            other => Err(format!("unknown player color: {other}")),
        }
    }
}

/// Contents of a cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    #[default]
    Empty,
    White,
    Black,
}

impl Color {
    pub fn is_empty(self) -> bool {
        self == Color::Empty
    }

    /// The stone owner, if any
    pub fn player(self) -> Option<Player> {
        match self {
            Color::Empty => None,
            Color::White => Some(Player::White),
            Color::Black => Some(Player::Black),
        }
    }

    pub fn is_friendly(self, player: Player) -> bool {
        self.player() == Some(player)
    }

    pub fn is_hostile(self, player: Player) -> bool {
        self.player() == Some(player.opponent())
    }

    /// Board glyph
    pub fn glyph(self) -> char {
        match self {
            Color::Empty => '.',
            Color::White => 'W',
            Color::Black => 'B',
        }
    }
}

impl From<Player> for Color {
    fn from(player: Player) -> Self {
        match player {
            Player::White => Color::White,
            Player::Black => Color::Black,
        }
    }
}
