//! Board geometry: cell coordinates, edge sentinels and graph nodes

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Player;
use crate::error::HexError;

/// Largest supported board (one column per letter)
pub const MAX_BOARD_SIZE: u8 = 26;

/// Grid address of a real cell.
///
/// `x` is the column (rendered as a letter, `a` = 1) and `y` the row,
/// both 1-indexed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i8,
    pub y: i8,
}

impl Coord {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Check if this coordinate is on a board of the given size
    pub fn is_on_board(&self, size: u8) -> bool {
        let size = size as i8;
        (1..=size).contains(&self.x) && (1..=size).contains(&self.y)
    }

    /// Parse a label such as `"e6"` for a board of the given size
    pub fn parse(label: &str, size: u8) -> Result<Self, HexError> {
        let label = label.trim();
        let mut chars = label.chars();
        let letter = chars
            .next()
            .map(|c| c.to_ascii_lowercase())
            .filter(char::is_ascii_lowercase)
            .ok_or_else(|| HexError::InvalidLabel(label.to_string()))?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(HexError::InvalidLabel(label.to_string()));
        }

        let column = letter as u8 - b'a' + 1;
        // digits that overflow u64 are simply far off the board
        let row = digits.parse::<u64>().ok().filter(|r| (1..=size as u64).contains(r));
        match row {
            Some(row) if column <= size => Ok(Coord::new(column as i8, row as i8)),
            _ => Err(HexError::OutOfBoard {
                label: label.to_string(),
                size,
            }),
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = if self.x <= 0 {
            '-'
        } else if self.x > MAX_BOARD_SIZE as i8 {
            '+'
        } else {
            (b'a' + self.x as u8 - 1) as char
        };
        write!(f, "{}{}", letter, self.y.max(0))
    }
}

/// One whole side of the board, used as a single virtual node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    /// Player whose stones this edge counts as
    pub fn owner(self) -> Player {
        match self {
            Edge::Top | Edge::Bottom => Player::White,
            Edge::Left | Edge::Right => Player::Black,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Edge::Top => "TOP",
            Edge::Bottom => "BOTTOM",
            Edge::Left => "LEFT",
            Edge::Right => "RIGHT",
        };
        f.write_str(name)
    }
}

/// A vertex of the connectivity graph: a real cell or an edge sentinel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Node {
    Cell(Coord),
    Edge(Edge),
}

impl Node {
    pub const fn cell(x: i8, y: i8) -> Self {
        Node::Cell(Coord::new(x, y))
    }

    pub fn coord(self) -> Option<Coord> {
        match self {
            Node::Cell(coord) => Some(coord),
            Node::Edge(_) => None,
        }
    }
}

impl From<Coord> for Node {
    fn from(coord: Coord) -> Self {
        Node::Cell(coord)
    }
}

impl From<Edge> for Node {
    fn from(edge: Edge) -> Self {
        Node::Edge(edge)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Cell(coord) => coord.fmt(f),
            Node::Edge(edge) => edge.fmt(f),
        }
    }
}
