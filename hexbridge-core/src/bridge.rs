//! Two-bridges and their status state machine
//!
//! A two-bridge links an origin to a non-adjacent destination through two
//! shared neighbours (the dependencies). While both dependencies are empty,
//! an opponent stone in one of them is answered by playing the other, so the
//! link cannot be cut.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::color::{Color, Player};
use crate::coord::Node;

/// Status of a two-bridge from one player's point of view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Origin is empty; the bridge is only potential
    Ready,
    /// Origin friendly, destination and dependencies empty
    ToBe,
    /// A dependency is already friendly
    Halfway,
    /// Origin and destination friendly, dependencies empty
    Success,
    /// Origin and destination friendly, one dependency lost to the opponent
    Jeopardy,
    /// The bridge can no longer complete
    Fail,
}

impl Status {
    /// Evaluate the status from the colours of the four cells involved.
    ///
    /// Rules are checked in order, first match wins.
    pub fn evaluate(origin: Color, dest: Color, depends: [Color; 2], player: Player) -> Status {
        let hostile_deps = depends.iter().filter(|c| c.is_hostile(player)).count();
        let friendly_deps = depends.iter().filter(|c| c.is_friendly(player)).count();

        if origin.is_empty() {
            return Status::Ready;
        }
        if origin.is_hostile(player)
            || dest.is_hostile(player)
            || hostile_deps == 2
            || (dest.is_empty() && hostile_deps > 0)
        {
            return Status::Fail;
        }
        if friendly_deps > 0 {
            return Status::Halfway;
        }
        // origin friendly, no friendly dependency, at most one hostile
        match (dest.is_empty(), hostile_deps) {
            (true, _) => Status::ToBe,
            (false, 0) => Status::Success,
            (false, _) => Status::Jeopardy,
        }
    }
}

/// A two-bridge stored on its origin cell
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TwoBridge {
    origin: Node,
    dest: Node,
    depends: (Node, Node),
    /// Cached status, indexed by player
    status: [Status; 2],
}

impl TwoBridge {
    pub(crate) fn new(origin: Node, dest: Node, depends: (Node, Node)) -> Self {
        Self {
            origin,
            dest,
            depends,
            status: [Status::Ready; 2],
        }
    }

    pub fn origin(&self) -> Node {
        self.origin
    }

    pub fn dest(&self) -> Node {
        self.dest
    }

    pub fn depends(&self) -> (Node, Node) {
        self.depends
    }

    pub fn depends_on(&self, node: Node) -> bool {
        self.depends.0 == node || self.depends.1 == node
    }

    /// Cached status for a player
    pub fn status(&self, player: Player) -> Status {
        self.status[player.index()]
    }

    /// Status for a player computed from the current board, ignoring the cache
    pub fn evaluate(&self, board: &Board, player: Player) -> Status {
        Status::evaluate(
            board.color(self.origin),
            board.color(self.dest),
            [board.color(self.depends.0), board.color(self.depends.1)],
            player,
        )
    }

    /// Both dependency cells are empty
    pub fn dependencies_clear(&self, board: &Board) -> bool {
        board.color(self.depends.0).is_empty() && board.color(self.depends.1).is_empty()
    }

    /// Recompute and cache the status for both players
    pub fn update_status(&mut self, board: &Board) -> [Status; 2] {
        let status = Player::BOTH.map(|player| self.evaluate(board, player));
        self.set_status(status);
        status
    }

    pub(crate) fn set_status(&mut self, status: [Status; 2]) {
        self.status = status;
    }
}
