//! Board cells and their fixed adjacency / two-bridge topology

use crate::bridge::TwoBridge;
use crate::color::Color;
use crate::coord::{Coord, Edge, Node};

/// Neighbour offsets (dx, dy) under the axial skew of the rhombus.
/// Order: upper-left, up, left, right, down, lower-right
pub const NEIGHBOUR_OFFSETS: [(i8, i8); 6] = [
    (-1, 1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (0, -1),
    (1, -1),
];

/// Geometry of one two-bridge direction
struct BridgeDirection {
    dest: (i8, i8),
    depends: [(i8, i8); 2],
    /// Edge that replaces the destination when it falls just off the board
    edge: Option<Edge>,
}

/// The six bridge directions. Entries pair up as reciprocals: 0/1, 2/3, 4/5,
/// and each pair lists the shared dependencies in the same order
const BRIDGE_DIRECTIONS: [BridgeDirection; 6] = [
    // upward
    BridgeDirection { dest: (-1, 2), depends: [(-1, 1), (0, 1)], edge: Some(Edge::Top) },
    // downward
    BridgeDirection { dest: (1, -2), depends: [(0, -1), (1, -1)], edge: Some(Edge::Bottom) },
    // leftward
    BridgeDirection { dest: (-2, 1), depends: [(-1, 0), (-1, 1)], edge: Some(Edge::Left) },
    // rightward
    BridgeDirection { dest: (2, -1), depends: [(1, -1), (1, 0)], edge: Some(Edge::Right) },
    // lower-left
    BridgeDirection { dest: (-1, -1), depends: [(-1, 0), (0, -1)], edge: None },
    // upper-right
    BridgeDirection { dest: (1, 1), depends: [(0, 1), (1, 0)], edge: None },
];

/// One board position, real or edge sentinel
#[derive(Clone, Debug)]
pub struct Cell {
    node: Node,
    color: Color,
    neighbours: Vec<Node>,
    bridges: Vec<TwoBridge>,
}

impl Cell {
    /// Create an empty real cell with its topology on a board of `size`
    pub fn new(coord: Coord, size: u8) -> Self {
        Self {
            node: Node::Cell(coord),
            color: Color::Empty,
            neighbours: neighbours_of(coord, size),
            bridges: bridges_of(coord, size),
        }
    }

    /// Create the sentinel for `edge` from the already-built real cells.
    ///
    /// Its neighbours are the cells touching the edge and its bridges are the
    /// reciprocals of every bridge that lands on the edge.
    pub fn sentinel(edge: Edge, cells: &[Cell]) -> Self {
        let node = Node::Edge(edge);
        let neighbours = cells
            .iter()
            .filter(|cell| cell.neighbours.contains(&node))
            .map(|cell| cell.node)
            .collect();
        let bridges = cells
            .iter()
            .flat_map(|cell| cell.bridges.iter())
            .filter(|bridge| bridge.dest() == node)
            .map(|bridge| TwoBridge::new(node, bridge.origin(), bridge.depends()))
            .collect();

        Self {
            node,
            color: edge.owner().into(),
            neighbours,
            bridges,
        }
    }

    pub fn node(&self) -> Node {
        self.node
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn neighbours(&self) -> &[Node] {
        &self.neighbours
    }

    pub fn bridges(&self) -> &[TwoBridge] {
        &self.bridges
    }

    /// The bridge from this cell to `dest`, if one exists
    pub fn bridge_to(&self, dest: Node) -> Option<&TwoBridge> {
        self.bridges.iter().find(|bridge| bridge.dest() == dest)
    }

    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub(crate) fn bridges_mut(&mut self) -> &mut [TwoBridge] {
        &mut self.bridges
    }
}

fn offset(coord: Coord, (dx, dy): (i8, i8)) -> Coord {
    Coord::new(coord.x + dx, coord.y + dy)
}

fn neighbours_of(coord: Coord, size: u8) -> Vec<Node> {
    let mut neighbours: Vec<Node> = NEIGHBOUR_OFFSETS
        .iter()
        .map(|&d| offset(coord, d))
        .filter(|c| c.is_on_board(size))
        .map(Node::Cell)
        .collect();

    let last = size as i8;
    if coord.x == 1 {
        neighbours.push(Node::Edge(Edge::Left));
    }
    if coord.x == last {
        neighbours.push(Node::Edge(Edge::Right));
    }
    if coord.y == last {
        neighbours.push(Node::Edge(Edge::Top));
    }
    if coord.y == 1 {
        neighbours.push(Node::Edge(Edge::Bottom));
    }
    neighbours
}

fn bridges_of(coord: Coord, size: u8) -> Vec<TwoBridge> {
    let origin = Node::Cell(coord);
    let mut bridges = Vec::with_capacity(BRIDGE_DIRECTIONS.len());

    for direction in &BRIDGE_DIRECTIONS {
        let [a, b] = direction.depends.map(|d| offset(coord, d));
        if !a.is_on_board(size) || !b.is_on_board(size) {
            continue;
        }
        let dest = offset(coord, direction.dest);
        let dest = if dest.is_on_board(size) {
            Node::Cell(dest)
        } else {
            match direction.edge {
                Some(edge) => Node::Edge(edge),
                None => continue,
            }
        };
        bridges.push(TwoBridge::new(origin, dest, (Node::Cell(a), Node::Cell(b))));
    }
    bridges
}
