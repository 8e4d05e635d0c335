//! Board: cell arena, colour index sets, two-bridge propagation and win check

use std::fmt;

use rustc_hash::FxHashSet;

use crate::bridge::{Status, TwoBridge};
use crate::cell::Cell;
use crate::color::{Color, Player};
use crate::coord::{Coord, Edge, Node, MAX_BOARD_SIZE};
use crate::error::HexError;

/// An N×N Hex board.
///
/// Real cells live in row-major order at the front of the arena, followed by
/// the four edge sentinels in [`Edge::ALL`] order.
#[derive(Clone, Debug)]
pub struct Board {
    size: u8,
    cells: Vec<Cell>,
    whites: FxHashSet<Coord>,
    blacks: FxHashSet<Coord>,
    empties: FxHashSet<Coord>,
}

impl Board {
    // ========================================================================
    // CONSTRUCTION
    // ========================================================================

    /// Create an empty board with all cells and two-bridges built
    pub fn new(size: u8) -> Result<Self, HexError> {
        if size == 0 || size > MAX_BOARD_SIZE {
            return Err(HexError::InvalidBoardSize {
                size,
                max: MAX_BOARD_SIZE,
            });
        }

        let coords = row_major(size);
        let mut cells: Vec<Cell> = coords.iter().map(|&c| Cell::new(c, size)).collect();
        let sentinels: Vec<Cell> = Edge::ALL
            .iter()
            .map(|&edge| Cell::sentinel(edge, &cells))
            .collect();
        cells.extend(sentinels);

        let mut board = Self {
            size,
            cells,
            whites: FxHashSet::default(),
            blacks: FxHashSet::default(),
            empties: coords.into_iter().collect(),
        };
        board.refresh_all_bridges();
        Ok(board)
    }

    fn refresh_all_bridges(&mut self) {
        let statuses: Vec<Vec<[Status; 2]>> = self
            .cells
            .iter()
            .map(|cell| {
                cell.bridges()
                    .iter()
                    .map(|bridge| Player::BOTH.map(|p| bridge.evaluate(self, p)))
                    .collect()
            })
            .collect();
        for (cell, statuses) in self.cells.iter_mut().zip(statuses) {
            for (bridge, status) in cell.bridges_mut().iter_mut().zip(statuses) {
                bridge.set_status(status);
            }
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn size(&self) -> u8 {
        self.size
    }

    fn index(&self, node: Node) -> Option<usize> {
        let size = self.size as usize;
        match node {
            Node::Cell(coord) if coord.is_on_board(self.size) => {
                Some((coord.y as usize - 1) * size + (coord.x as usize - 1))
            }
            Node::Cell(_) => None,
            Node::Edge(edge) => Some(size * size + edge as usize),
        }
    }

    pub fn cell(&self, node: impl Into<Node>) -> Option<&Cell> {
        self.index(node.into()).map(|i| &self.cells[i])
    }

    /// Colour of a node; off-board coordinates read as empty
    pub fn color(&self, node: impl Into<Node>) -> Color {
        self.cell(node).map_or(Color::Empty, Cell::color)
    }

    /// Neighbours of a node; empty for off-board coordinates
    pub fn neighbours(&self, node: Node) -> &[Node] {
        match self.cell(node) {
            Some(cell) => cell.neighbours(),
            None => &[],
        }
    }

    /// All cells, real cells first in row-major order, then the sentinels
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Real cells only, in row-major order
    pub fn real_cells(&self) -> &[Cell] {
        let n = self.size as usize;
        &self.cells[..n * n]
    }

    pub fn empties(&self) -> &FxHashSet<Coord> {
        &self.empties
    }

    pub fn stones(&self, player: Player) -> &FxHashSet<Coord> {
        match player {
            Player::White => &self.whites,
            Player::Black => &self.blacks,
        }
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.real_cells()
            .iter()
            .filter(|cell| cell.color().is_empty())
            .filter_map(|cell| cell.node().coord())
    }

    /// Stones of `player` in row-major order
    pub fn stone_cells(&self, player: Player) -> impl Iterator<Item = Coord> + '_ {
        let color = Color::from(player);
        self.real_cells()
            .iter()
            .filter(move |cell| cell.color() == color)
            .filter_map(|cell| cell.node().coord())
    }

    pub fn is_full(&self) -> bool {
        self.empties.is_empty()
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Place a stone on an empty cell, then refresh the affected two-bridges.
    ///
    /// Returns false, without touching the board, if the cell is occupied or
    /// not on the board.
    pub fn set(&mut self, coord: Coord, player: Player) -> bool {
        if !self.empties.remove(&coord) {
            return false;
        }
        match player {
            Player::White => self.whites.insert(coord),
            Player::Black => self.blacks.insert(coord),
        };
        self.recolor(coord, player.into());
        true
    }

    /// Remove a stone, then refresh the affected two-bridges.
    ///
    /// Returns false if the cell is already empty or not on the board.
    pub fn unset(&mut self, coord: Coord) -> bool {
        if !(self.whites.remove(&coord) || self.blacks.remove(&coord)) {
            return false;
        }
        self.empties.insert(coord);
        self.recolor(coord, Color::Empty);
        true
    }

    fn recolor(&mut self, coord: Coord, color: Color) {
        let node = Node::Cell(coord);
        if let Some(i) = self.index(node) {
            self.cells[i].set_color(color);
        }
        let jeopardized = self.propagate(node);
        if jeopardized > 0 {
            tracing::debug!(cell = %coord, jeopardized, "two-bridges in jeopardy");
        }
    }

    /// Every (cell index, bridge slot) whose status depends on `node`'s colour:
    /// the node's own bridges, their reciprocals at each destination, and the
    /// bridges of its neighbours that use it as a dependency.
    fn affected_bridges(&self, node: Node) -> Vec<(usize, usize)> {
        let Some(origin) = self.index(node) else {
            return Vec::new();
        };
        let cell = &self.cells[origin];
        let mut targets = Vec::new();

        for (slot, bridge) in cell.bridges().iter().enumerate() {
            targets.push((origin, slot));
            if let Some(dest) = self.index(bridge.dest()) {
                let reciprocal = self.cells[dest]
                    .bridges()
                    .iter()
                    .position(|b| b.dest() == node);
                if let Some(reciprocal) = reciprocal {
                    targets.push((dest, reciprocal));
                }
            }
        }

        for &neighbour in cell.neighbours() {
            let Some(n) = self.index(neighbour) else {
                continue;
            };
            for (slot, bridge) in self.cells[n].bridges().iter().enumerate() {
                if bridge.depends_on(node) {
                    targets.push((n, slot));
                }
            }
        }
        targets
    }

    /// Recompute every two-bridge status that depends on `node`.
    ///
    /// Returns how many of the recomputed bridges are now in jeopardy for
    /// either player.
    pub fn propagate(&mut self, node: Node) -> usize {
        let targets = self.affected_bridges(node);
        let statuses: Vec<[Status; 2]> = targets
            .iter()
            .map(|&(cell, slot)| {
                let bridge = &self.cells[cell].bridges()[slot];
                Player::BOTH.map(|p| bridge.evaluate(self, p))
            })
            .collect();

        let mut jeopardized = 0;
        for ((cell, slot), status) in targets.into_iter().zip(statuses) {
            if status.contains(&Status::Jeopardy) {
                jeopardized += 1;
            }
            self.cells[cell].bridges_mut()[slot].set_status(status);
        }
        jeopardized
    }

    /// Bridges currently in jeopardy for `player`, on its stones and edges,
    /// in arena order
    pub fn jeopardized_bridges(&self, player: Player) -> impl Iterator<Item = &TwoBridge> + '_ {
        let color = Color::from(player);
        self.cells
            .iter()
            .filter(move |cell| cell.color() == color)
            .flat_map(|cell| cell.bridges().iter())
            .filter(move |bridge| bridge.status(player) == Status::Jeopardy)
    }

    // ========================================================================
    // WIN DETECTION
    // ========================================================================

    /// Check whether either player has connected their edges.
    ///
    /// Nobody can have won before `2N - 1` stones are down, so no search runs
    /// for smaller move counts.
    pub fn check_win(&self, move_count: usize) -> Option<Player> {
        if move_count < 2 * self.size as usize - 1 {
            return None;
        }
        let white = self.is_connected(Player::White);
        let black = self.is_connected(Player::Black);
        debug_assert!(!(white && black), "both players connected");

        if white {
            Some(Player::White)
        } else if black {
            Some(Player::Black)
        } else {
            None
        }
    }

    /// True if `player`'s stones join its two edges
    pub fn is_connected(&self, player: Player) -> bool {
        let (start, goal) = player.edges();
        self.bidirectional_search(Node::Edge(start), Node::Edge(goal), player.into())
    }

    /// Breadth-first search from both ends, one layer at a time, over the
    /// subgraph of `color`.
    fn bidirectional_search(&self, start: Node, goal: Node, color: Color) -> bool {
        let mut forward = Frontier::new(start);
        let mut backward = Frontier::new(goal);
        let mut expand_forward = true;

        while !forward.layer.is_empty() && !backward.layer.is_empty() {
            let (active, other) = if expand_forward {
                (&mut forward, &backward)
            } else {
                (&mut backward, &forward)
            };

            let mut next = Vec::new();
            for &node in &active.layer {
                for &child in self.neighbours(node) {
                    if self.color(child) != color {
                        continue;
                    }
                    if other.seen.contains(&child) {
                        return true;
                    }
                    if active.seen.insert(child) {
                        next.push(child);
                    }
                }
            }
            active.layer = next;
            expand_forward = !expand_forward;
        }
        false
    }
}

/// One side of the bidirectional search
struct Frontier {
    layer: Vec<Node>,
    seen: FxHashSet<Node>,
}

impl Frontier {
    fn new(root: Node) -> Self {
        let mut seen = FxHashSet::default();
        seen.insert(root);
        Self {
            layer: vec![root],
            seen,
        }
    }
}

fn row_major(size: u8) -> Vec<Coord> {
    let n = size as i8;
    (1..=n)
        .flat_map(|y| (1..=n).map(move |x| Coord::new(x, y)))
        .collect()
}

/// Rows from the top, each indented one more space than the row above
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.size as i8;
        for y in (1..=n).rev() {
            write!(f, "{}", " ".repeat(y as usize - 1))?;
            for x in 1..=n {
                write!(f, "{} ", self.color(Coord::new(x, y)).glyph())?;
            }
            if y != 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: u8) -> Board {
        Board::new(size).unwrap()
    }

    fn c(x: i8, y: i8) -> Coord {
        Coord::new(x, y)
    }

    fn assert_partition(board: &Board) {
        let n = board.size() as usize;
        assert_eq!(
            board.stones(Player::White).len()
                + board.stones(Player::Black).len()
                + board.empties().len(),
            n * n
        );
        for cell in board.real_cells() {
            let coord = cell.node().coord().unwrap();
            let memberships = [
                board.stones(Player::White).contains(&coord),
                board.stones(Player::Black).contains(&coord),
                board.empties().contains(&coord),
            ];
            assert_eq!(memberships.iter().filter(|&&m| m).count(), 1);
        }
    }

    fn assert_bridges_current(board: &Board) {
        for cell in board.cells() {
            for bridge in cell.bridges() {
                for player in Player::BOTH {
                    assert_eq!(
                        bridge.status(player),
                        bridge.evaluate(board, player),
                        "stale {:?}->{:?} for {:?}",
                        bridge.origin(),
                        bridge.dest(),
                        player
                    );
                }
            }
        }
    }

    #[test]
    fn test_invalid_sizes() {
        assert!(matches!(Board::new(0), Err(HexError::InvalidBoardSize { .. })));
        assert!(matches!(Board::new(27), Err(HexError::InvalidBoardSize { .. })));
        assert!(Board::new(26).is_ok());
    }

    #[test]
    fn test_new_board_is_empty() {
        let b = board(5);
        assert_eq!(b.empties().len(), 25);
        assert_eq!(b.cells().len(), 29);
        assert_eq!(b.color(Edge::Top), Color::White);
        assert_eq!(b.color(Edge::Left), Color::Black);
        assert_partition(&b);
        assert_bridges_current(&b);
    }

    #[test]
    fn test_set_and_unset() {
        let mut b = board(4);
        assert!(b.set(c(2, 2), Player::White));
        assert!(!b.set(c(2, 2), Player::Black));
        assert_eq!(b.color(c(2, 2)), Color::White);
        assert_partition(&b);

        assert!(b.unset(c(2, 2)));
        assert!(!b.unset(c(2, 2)));
        assert_eq!(b.color(c(2, 2)), Color::Empty);
        assert_partition(&b);
    }

    #[test]
    fn test_stone_cells_row_major() {
        let mut b = board(4);
        b.set(c(3, 2), Player::White);
        b.set(c(1, 4), Player::White);
        b.set(c(4, 1), Player::White);
        b.set(c(2, 2), Player::Black);
        let whites: Vec<Coord> = b.stone_cells(Player::White).collect();
        assert_eq!(whites, vec![c(4, 1), c(3, 2), c(1, 4)]);
        assert_eq!(b.stones(Player::White).len(), 3);
        assert_eq!(b.empty_cells().next(), Some(c(1, 1)));
    }

    #[test]
    fn test_set_off_board_rejected() {
        let mut b = board(4);
        assert!(!b.set(c(5, 1), Player::White));
        assert!(!b.set(c(0, 0), Player::Black));
        assert!(!b.unset(c(9, 9)));
        assert_partition(&b);
    }

    #[test]
    fn test_neighbour_symmetry() {
        let b = board(6);
        for cell in b.real_cells() {
            for &n in cell.neighbours() {
                if let Node::Cell(_) = n {
                    assert!(b.neighbours(n).contains(&cell.node()));
                }
            }
        }
        // sentinel adjacency is the set of cells listing the sentinel
        for edge in Edge::ALL {
            for &n in b.neighbours(Node::Edge(edge)) {
                assert!(b.neighbours(n).contains(&Node::Edge(edge)));
            }
            assert_eq!(b.neighbours(Node::Edge(edge)).len(), 6);
        }
    }

    #[test]
    fn test_every_bridge_has_reciprocal() {
        let b = board(6);
        for cell in b.cells() {
            for bridge in cell.bridges() {
                let back = b.cell(bridge.dest()).and_then(|d| d.bridge_to(cell.node()));
                let back = back.expect("missing reciprocal");
                assert_eq!(back.depends(), bridge.depends());
            }
        }
    }

    #[test]
    fn test_to_be_then_fail() {
        // friendly (2,2) bridges upward to (1,4) through (1,3) and (2,3)
        let mut b = board(4);
        b.set(c(2, 2), Player::White);
        let bridge = b.cell(c(2, 2)).unwrap().bridge_to(Node::cell(1, 4)).unwrap();
        assert_eq!(bridge.status(Player::White), Status::ToBe);

        b.set(c(1, 3), Player::Black);
        let bridge = b.cell(c(2, 2)).unwrap().bridge_to(Node::cell(1, 4)).unwrap();
        assert_eq!(bridge.status(Player::White), Status::Fail);
        assert_bridges_current(&b);
    }

    #[test]
    fn test_jeopardy_answered_then_restored() {
        let mut b = board(5);
        b.set(c(2, 2), Player::White);
        b.set(c(3, 3), Player::White);
        let status = |b: &Board| {
            b.cell(c(2, 2))
                .unwrap()
                .bridge_to(Node::cell(3, 3))
                .unwrap()
                .status(Player::White)
        };
        assert_eq!(status(&b), Status::Success);

        b.set(c(3, 2), Player::Black);
        assert_eq!(status(&b), Status::Jeopardy);
        // reciprocal agrees
        let back = b.cell(c(3, 3)).unwrap().bridge_to(Node::cell(2, 2)).unwrap();
        assert_eq!(back.status(Player::White), Status::Jeopardy);
        assert_eq!(b.jeopardized_bridges(Player::White).count(), 2);

        // answering in the other dependency makes it Halfway, not Success:
        // a friendly dependency takes precedence and the ends now touch directly
        b.set(c(2, 3), Player::White);
        assert_eq!(status(&b), Status::Halfway);
        assert_eq!(b.jeopardized_bridges(Player::White).count(), 0);
        assert!(b.neighbours(Node::cell(2, 3)).contains(&Node::cell(2, 2)));
        assert!(b.neighbours(Node::cell(2, 3)).contains(&Node::cell(3, 3)));

        // undoing the intrusion as well restores a clean bridge
        b.unset(c(3, 2));
        b.unset(c(2, 3));
        assert_eq!(status(&b), Status::Success);
        assert_bridges_current(&b);
    }

    #[test]
    fn test_edge_bridge_tracks_cells() {
        let mut b = board(4);
        b.set(c(2, 3), Player::White);
        let top = b.cell(Edge::Top).unwrap().bridge_to(Node::cell(2, 3)).unwrap();
        assert_eq!(top.status(Player::White), Status::Success);
        assert_eq!(top.status(Player::Black), Status::Fail);

        b.set(c(1, 4), Player::Black);
        let top = b.cell(Edge::Top).unwrap().bridge_to(Node::cell(2, 3)).unwrap();
        assert_eq!(top.status(Player::White), Status::Jeopardy);
        assert_eq!(b.jeopardized_bridges(Player::White).count(), 2);
        assert_bridges_current(&b);
    }

    #[test]
    fn test_propagate_idempotent() {
        let mut b = board(5);
        b.set(c(3, 3), Player::Black);
        b.set(c(4, 4), Player::Black);
        b.set(c(4, 3), Player::White);
        let before: Vec<_> = b
            .cells()
            .iter()
            .flat_map(|cell| cell.bridges().iter().map(|br| [br.status(Player::White), br.status(Player::Black)]))
            .collect();
        b.propagate(Node::cell(4, 3));
        b.propagate(Node::cell(4, 3));
        let after: Vec<_> = b
            .cells()
            .iter()
            .flat_map(|cell| cell.bridges().iter().map(|br| [br.status(Player::White), br.status(Player::Black)]))
            .collect();
        assert_eq!(before, after);

        let mut bridge = b.cell(c(3, 3)).unwrap().bridges()[0].clone();
        let first = bridge.update_status(&b);
        let second = bridge.update_status(&b);
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_win_below_bound() {
        let mut b = board(3);
        for y in 1..=3 {
            b.set(c(2, y), Player::White);
        }
        // connected, but fewer than 2N - 1 moves reported
        for moves in 0..5 {
            assert_eq!(b.check_win(moves), None);
        }
        assert!(b.is_connected(Player::White));
        assert_eq!(b.check_win(5), Some(Player::White));
    }

    #[test]
    fn test_white_wins_down_middle_column() {
        let mut b = board(3);
        b.set(c(2, 1), Player::White);
        b.set(c(1, 1), Player::Black);
        b.set(c(2, 2), Player::White);
        b.set(c(3, 3), Player::Black);
        assert_eq!(b.check_win(4), None);
        assert_eq!(b.check_win(5), None);
        b.set(c(2, 3), Player::White);
        assert_eq!(b.check_win(5), Some(Player::White));
    }

    #[test]
    fn test_middle_row_joins_left_and_right() {
        // rows run LEFT to RIGHT, so a full row is a Black connection only
        let mut b = board(3);
        for x in 1..=3 {
            b.set(c(x, 2), Player::White);
        }
        assert!(!b.is_connected(Player::White));
        assert_eq!(b.check_win(9), None);

        let mut b = board(3);
        for x in 1..=3 {
            b.set(c(x, 2), Player::Black);
        }
        b.set(c(1, 1), Player::White);
        b.set(c(3, 3), Player::White);
        assert_eq!(b.check_win(4), None);
        assert_eq!(b.check_win(5), Some(Player::Black));
    }

    #[test]
    fn test_black_wins_across() {
        let mut b = board(4);
        // a bent line from LEFT to RIGHT, missing (3,1)
        for coord in [c(1, 2), c(2, 2), c(4, 1)] {
            b.set(coord, Player::Black);
        }
        assert_eq!(b.check_win(7), None);
        b.set(c(3, 1), Player::Black);
        assert_eq!(b.check_win(6), None);
        assert_eq!(b.check_win(7), Some(Player::Black));
        assert!(!b.is_connected(Player::White));
    }

    #[test]
    fn test_no_winner_when_path_blocked() {
        let mut b = board(3);
        b.set(c(2, 3), Player::White);
        b.set(c(2, 2), Player::White);
        b.set(c(2, 1), Player::Black);
        assert!(!b.is_connected(Player::White));
        assert!(!b.is_connected(Player::Black));
        assert_eq!(b.check_win(9), None);
    }

    #[test]
    fn test_single_cell_board() {
        let mut b = board(1);
        assert_eq!(b.check_win(1), None);
        b.set(c(1, 1), Player::Black);
        assert_eq!(b.check_win(1), Some(Player::Black));
    }

    #[test]
    fn test_display() {
        let mut b = board(3);
        b.set(c(1, 3), Player::White);
        b.set(c(3, 1), Player::Black);
        assert_eq!(b.to_string(), "  W . . \n . . . \n. . B ");
    }
}
