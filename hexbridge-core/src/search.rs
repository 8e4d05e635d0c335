//! Least-cost connection search
//!
//! Finds the path between a player's two edges that needs the fewest
//! additional stones. Entering an empty cell costs one stone, entering a
//! friendly cell is free, and intact two-bridges act as extra edges that jump
//! over their dependency cells.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;

use crate::board::Board;
use crate::bridge::Status;
use crate::color::{Color, Player};
use crate::coord::{Coord, Edge, Node};

/// How the search entered a node
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Link {
    /// The source edge
    Start,
    /// Direct adjacency
    Neighbour,
    /// Across a two-bridge
    Bridge,
}

/// One node of a connection, with the link used to reach it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathStep {
    pub node: Node,
    pub link: Link,
}

/// Cheapest path between a player's edges
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub player: Player,
    /// Stones still needed to complete the connection
    pub cost: u32,
    /// Source edge first, target edge last
    pub steps: Vec<PathStep>,
}

impl Connection {
    /// Empty real cells on the path, in path order
    pub fn open_cells<'a>(&'a self, board: &'a Board) -> impl Iterator<Item = (Coord, Link)> + 'a {
        self.steps.iter().filter_map(move |step| match step.node {
            Node::Cell(coord) if board.color(coord).is_empty() => Some((coord, step.link)),
            _ => None,
        })
    }
}

/// Cost of crossing a two-bridge, read forwards from its origin or
/// backwards from its destination. `None` if the bridge cannot be used.
fn bridge_step_cost(forward: Status, backward: Option<Status>, dependencies_clear: bool) -> Option<u32> {
    match (forward, backward) {
        (Status::Success, _) => Some(0),
        // destination already friendly, the reciprocal reads the bridge as ToBe
        (_, Some(Status::ToBe)) => Some(0),
        (Status::ToBe, _) => Some(1),
        (Status::Ready, _) if dependencies_clear => Some(1),
        _ => None,
    }
}

fn entry_cost(color: Color, player: Player) -> Option<u32> {
    if color.is_friendly(player) {
        Some(0)
    } else if color.is_empty() {
        Some(1)
    } else {
        None
    }
}

/// Outgoing (node, cost, link) edges of `node` in `player`'s search graph
fn successors(board: &Board, node: Node, player: Player) -> Vec<(Node, u32, Link)> {
    let Some(cell) = board.cell(node) else {
        return Vec::new();
    };
    let mut edges = Vec::with_capacity(cell.neighbours().len() + cell.bridges().len());

    for &next in cell.neighbours() {
        if let Some(cost) = entry_cost(board.color(next), player) {
            edges.push((next, cost, Link::Neighbour));
        }
    }

    for bridge in cell.bridges() {
        let dest = bridge.dest();
        if board.color(dest).is_hostile(player) {
            continue;
        }
        let backward = board
            .cell(dest)
            .and_then(|d| d.bridge_to(node))
            .map(|reciprocal| reciprocal.status(player));
        let cost = bridge_step_cost(bridge.status(player), backward, bridge.dependencies_clear(board));
        if let Some(cost) = cost {
            edges.push((dest, cost, Link::Bridge));
        }
    }
    edges
}

/// Search-local bookkeeping for one node
#[derive(Clone, Copy, Debug)]
struct Visit {
    cost: u32,
    parent: Option<Node>,
    link: Link,
}

/// Cheapest connection between `player`'s own edges
pub fn cheapest_connection(board: &Board, player: Player) -> Option<Connection> {
    let (source, target) = player.edges();
    cheapest_path(board, player, source, target)
}

/// Priority-queue relaxation from `source` to `target`.
///
/// Equal-cost nodes are expanded in discovery order, which makes the returned
/// path deterministic. A node is relaxed again whenever a cheaper route to it
/// turns up; stale queue entries are skipped when popped.
pub fn cheapest_path(board: &Board, player: Player, source: Edge, target: Edge) -> Option<Connection> {
    let start = Node::Edge(source);
    let goal = Node::Edge(target);

    let mut visits: FxHashMap<Node, Visit> = FxHashMap::default();
    let mut open = BinaryHeap::new();
    let mut discovered: u32 = 0;

    visits.insert(start, Visit { cost: 0, parent: None, link: Link::Start });
    open.push(Reverse((0u32, discovered, start)));

    while let Some(Reverse((cost, _, node))) = open.pop() {
        if visits.get(&node).is_some_and(|v| cost > v.cost) {
            continue;
        }
        if node == goal {
            tracing::trace!(%player, cost, "connection found");
            return Some(Connection {
                player,
                cost,
                steps: trace_back(&visits, goal),
            });
        }

        for (next, step, link) in successors(board, node, player) {
            let next_cost = cost + step;
            let improves = visits.get(&next).map_or(true, |v| next_cost < v.cost);
            if improves {
                visits.insert(next, Visit { cost: next_cost, parent: Some(node), link });
                discovered += 1;
                open.push(Reverse((next_cost, discovered, next)));
            }
        }
    }

    tracing::trace!(%player, "no connection possible");
    None
}

fn trace_back(visits: &FxHashMap<Node, Visit>, goal: Node) -> Vec<PathStep> {
    let mut steps = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        let Some(visit) = visits.get(&node) else {
            break;
        };
        steps.push(PathStep { node, link: visit.link });
        current = visit.parent;
    }
    steps.reverse();
    steps
}
